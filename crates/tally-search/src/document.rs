//! Searchable projections of transactions.
//!
//! Each transaction is flattened into a [`SearchableDocument`]: the text of the transaction
//! itself plus the names of everything it points at (category and its ancestors, account and
//! bank, trip, tags). Documents borrow their text from the inputs and are rebuilt on every
//! search call.

use std::{collections::HashMap, fmt};

use serde::Serialize;

use crate::model::{Bank, BankAccount, Category, Id, Tag, Transaction, Trip};

/// The source of a document fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Vendor or payer name.
    Payee,
    /// Counterparty name.
    Counterparty,
    /// Free-text note.
    Description,
    /// The transaction's category or one of its ancestors.
    Category,
    /// Bank owning the account.
    Bank,
    /// Bank account.
    Account,
    /// Linked trip.
    Trip,
    /// Attached tag.
    Tag,
}

impl Field {
    /// Returns the lower-case field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payee => "payee",
            Self::Counterparty => "counterparty",
            Self::Description => "description",
            Self::Category => "category",
            Self::Bank => "bank",
            Self::Account => "account",
            Self::Trip => "trip",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of searchable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<'a> {
    /// Where the text came from.
    pub field: Field,
    /// The text as stored.
    pub text: &'a str,
    /// Lower-cased text used for matching.
    folded: String,
}

impl<'a> Fragment<'a> {
    /// Creates a fragment, folding its case once.
    fn new(field: Field, text: &'a str) -> Self {
        Self {
            field,
            text,
            folded: text.to_lowercase(),
        }
    }

    /// Returns the lower-cased text.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Returns true if the fragment contains `needle`, which must already be lower-cased.
    pub fn contains(&self, needle: &str) -> bool {
        self.folded.contains(needle)
    }
}

/// The flattened text of one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchableDocument<'a> {
    /// Fragments in projection order.
    fragments: Vec<Fragment<'a>>,
}

impl<'a> SearchableDocument<'a> {
    /// Appends a fragment, skipping empty text.
    fn push(&mut self, field: Field, text: &'a str) {
        if !text.is_empty() {
            self.fragments.push(Fragment::new(field, text));
        }
    }

    /// Appends a fragment if present.
    fn push_opt(&mut self, field: Field, text: Option<&'a str>) {
        if let Some(text) = text {
            self.push(field, text);
        }
    }

    /// Returns all fragments in projection order.
    pub fn fragments(&self) -> &[Fragment<'a>] {
        &self.fragments
    }

    /// Returns the texts projected from a single field, in order.
    pub fn texts(&self, field: Field) -> impl Iterator<Item = &'a str> + '_ {
        self.fragments
            .iter()
            .filter(move |fragment| fragment.field == field)
            .map(|fragment| fragment.text)
    }

    /// Returns true if `needle` (already lower-cased) is a substring of any fragment.
    ///
    /// The empty needle is contained in every document, including an empty one.
    pub fn contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.fragments.iter().any(|f| f.contains(needle))
    }

    /// Returns the number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if the document has no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// A node in the category arena.
#[derive(Debug, Clone)]
struct CategoryNode<'a> {
    /// Category name.
    name: &'a str,
    /// Arena index of the parent, if it resolves.
    parent: Option<usize>,
}

/// Category tree built from a flat list, addressed by id.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree<'a> {
    /// Arena of nodes, one per input category.
    nodes: Vec<CategoryNode<'a>>,
    /// Category id to arena index. The first category with a given id wins.
    index: HashMap<Id, usize>,
}

impl<'a> CategoryTree<'a> {
    /// Builds the tree. Dangling parent ids make a node a root.
    pub fn new(categories: &'a [Category]) -> Self {
        let mut index = HashMap::with_capacity(categories.len());
        for (i, category) in categories.iter().enumerate() {
            index.entry(category.id).or_insert(i);
        }

        let nodes = categories
            .iter()
            .map(|category| CategoryNode {
                name: &category.name,
                parent: category.parent_id.and_then(|id| index.get(&id).copied()),
            })
            .collect();

        Self { nodes, index }
    }

    /// Returns the names from the category itself up to its root.
    ///
    /// Returns an empty list for an unknown id. A parent cycle ends the walk once every
    /// node on it has been visited.
    pub fn path(&self, id: Id) -> Vec<&'a str> {
        let mut names = Vec::new();
        let mut current = self.index.get(&id).copied();

        while let Some(i) = current {
            if names.len() >= self.nodes.len() {
                break;
            }
            let node = &self.nodes[i];
            names.push(node.name);
            current = node.parent;
        }

        names
    }
}

/// Id lookups over the reference data, built once per search call.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex<'a> {
    /// Category tree for ancestor resolution.
    categories: CategoryTree<'a>,
    /// Banks by id.
    banks: HashMap<Id, &'a Bank>,
    /// Bank accounts by id.
    bank_accounts: HashMap<Id, &'a BankAccount>,
    /// Trips by id.
    trips: HashMap<Id, &'a Trip>,
    /// Tags by id.
    tags: HashMap<Id, &'a Tag>,
}

impl<'a> ReferenceIndex<'a> {
    /// Builds lookups over the given reference data.
    pub fn new(
        categories: &'a [Category],
        banks: &'a [Bank],
        bank_accounts: &'a [BankAccount],
        trips: &'a [Trip],
        tags: &'a [Tag],
    ) -> Self {
        Self {
            categories: CategoryTree::new(categories),
            banks: index_by_id(banks, |b| b.id),
            bank_accounts: index_by_id(bank_accounts, |a| a.id),
            trips: index_by_id(trips, |t| t.id),
            tags: index_by_id(tags, |t| t.id),
        }
    }

    /// Projects a transaction into its searchable document.
    ///
    /// Foreign keys that do not resolve are skipped.
    pub fn project(&self, transaction: &'a Transaction) -> SearchableDocument<'a> {
        let mut doc = SearchableDocument::default();

        doc.push_opt(Field::Payee, transaction.payee.as_deref());
        doc.push_opt(Field::Counterparty, transaction.counterparty.as_deref());
        doc.push_opt(Field::Description, transaction.description.as_deref());

        if let Some(category_id) = transaction.category_id {
            for name in self.categories.path(category_id) {
                doc.push(Field::Category, name);
            }
        }

        if let Some(account) = transaction
            .bank_account_id
            .and_then(|id| self.bank_accounts.get(&id).copied())
        {
            if let Some(bank) = self.banks.get(&account.bank_id).copied() {
                doc.push(Field::Bank, &bank.name);
            }
            doc.push(Field::Account, &account.name);
        }

        if let Some(trip) = transaction.trip_id.and_then(|id| self.trips.get(&id).copied()) {
            doc.push(Field::Trip, &trip.name);
        }

        for tag in transaction
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id).copied())
        {
            doc.push(Field::Tag, &tag.name);
        }

        doc
    }

    /// Returns the category path for an id, from the category itself up to the root.
    pub fn category_path(&self, id: Id) -> Vec<&'a str> {
        self.categories.path(id)
    }
}

/// Indexes items by id, keeping the first occurrence of each id.
fn index_by_id<'a, T>(items: &'a [T], id: impl Fn(&T) -> Id) -> HashMap<Id, &'a T> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.entry(id(item)).or_insert(item);
    }
    map
}

/// Projects a single transaction against the given reference data.
///
/// Convenience wrapper that builds a [`ReferenceIndex`] for one transaction; searches over
/// many transactions should build the index once instead.
pub fn project<'a>(
    transaction: &'a Transaction,
    categories: &'a [Category],
    banks: &'a [Bank],
    bank_accounts: &'a [BankAccount],
    trips: &'a [Trip],
    tags: &'a [Tag],
) -> SearchableDocument<'a> {
    ReferenceIndex::new(categories, banks, bank_accounts, trips, tags).project(transaction)
}
