//! Core data types: views, the lattice, chromosomes and the objective.
//!
//! A [`Chromosome`] stores lattice indices rather than view copies, so
//! cloning one is cheap and every chromosome of a run refers back to the
//! same immutable [`Lattice`].

use crate::error::{MemeticError, Result};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// A candidate materialized view.
///
/// Views are immutable records handed over by the lattice provider.
/// Two views are considered the same view when their labels match.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    /// Unique identifier of the view.
    pub label: String,

    /// Storage cost of materializing the view.
    pub size: f64,

    /// Position in the aggregation hierarchy; 0 is the base view.
    pub level: u32,

    /// Dimensions the view aggregates over.
    pub dimensions: BTreeSet<String>,
}

impl View {
    /// Creates a view from its label, size, level and dimension names.
    pub fn new<I, S>(label: impl Into<String>, size: f64, level: u32, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            size,
            level,
            dimensions: dimensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if both views aggregate over at least one common dimension.
    pub fn shares_dimension(&self, other: &View) -> bool {
        !self.dimensions.is_disjoint(&other.dimensions)
    }
}

/// The ordered set of candidate views.
///
/// Index 0 is the base view, which every chromosome must contain.
/// Labels are interned at construction so label equality reduces to an
/// integer comparison.
#[derive(Debug, Clone)]
pub struct Lattice {
    views: Vec<View>,
    label_ids: Vec<usize>,
    distinct_labels: usize,
}

impl Lattice {
    /// Builds a lattice from an ordered list of views.
    ///
    /// # Errors
    /// Returns [`MemeticError::InvalidConfiguration`] if `views` is empty or
    /// any view has a negative or non-finite size.
    pub fn new(views: Vec<View>) -> Result<Self> {
        if views.is_empty() {
            return Err(MemeticError::InvalidConfiguration(
                "lattice must contain at least the base view".into(),
            ));
        }
        if let Some(bad) = views.iter().find(|v| !v.size.is_finite() || v.size < 0.0) {
            return Err(MemeticError::InvalidConfiguration(format!(
                "view '{}' has invalid size {}",
                bad.label, bad.size
            )));
        }

        let (label_ids, distinct_labels) = {
            let mut ids: HashMap<&str, usize> = HashMap::with_capacity(views.len());
            let label_ids: Vec<usize> = views
                .iter()
                .map(|v| {
                    let next = ids.len();
                    *ids.entry(v.label.as_str()).or_insert(next)
                })
                .collect();
            (label_ids, ids.len())
        };

        Ok(Self {
            views,
            label_ids,
            distinct_labels,
        })
    }

    /// All views in lattice order.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// The base view (lattice index 0).
    pub fn base(&self) -> &View {
        &self.views[0]
    }

    /// The view at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn view(&self, index: usize) -> &View {
        &self.views[index]
    }

    /// Number of views, duplicates included.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Always `false`: a lattice holds at least its base view.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Number of distinct labels.
    pub fn distinct_labels(&self) -> usize {
        self.distinct_labels
    }

    /// Interned label id of the view at `index`.
    pub(crate) fn label_id(&self, index: usize) -> usize {
        self.label_ids[index]
    }

    /// Total storage cost of every view in the lattice.
    pub fn total_size(&self) -> f64 {
        self.views.iter().map(|v| v.size).sum()
    }
}

/// Source of the lattice a run optimizes over.
///
/// Lattice construction from a schema is owned by the caller; the
/// optimizer only consumes the ordered result.
pub trait LatticeProvider {
    /// Produces the ordered candidate lattice.
    fn lattice(&self) -> Result<Lattice>;
}

impl LatticeProvider for Lattice {
    fn lattice(&self) -> Result<Lattice> {
        Ok(self.clone())
    }
}

impl LatticeProvider for Vec<View> {
    fn lattice(&self) -> Result<Lattice> {
        Lattice::new(self.clone())
    }
}

/// Direction in which fitness scores are ranked.
///
/// The fitness function computes a total storage-plus-answering cost.
/// [`Minimize`](Objective::Minimize) treats that as a cost to lower;
/// [`Maximize`](Objective::Maximize) ranks the highest score first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    /// Lower fitness is better.
    #[default]
    Minimize,
    /// Higher fitness is better.
    Maximize,
}

impl Objective {
    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Objective::Minimize => a < b,
            Objective::Maximize => a > b,
        }
    }

    /// The worst possible score, used for chromosomes not yet evaluated.
    pub fn worst(self) -> f64 {
        match self {
            Objective::Minimize => f64::INFINITY,
            Objective::Maximize => f64::NEG_INFINITY,
        }
    }

    /// Orders two scores best-first.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Objective::Minimize => ord,
            Objective::Maximize => ord.reverse(),
        }
    }
}

/// A candidate solution: the base view plus `top_view_count` other views.
///
/// Fitness is cached as `Option<f64>`; `None` means not yet evaluated, so a
/// legitimate score of zero is never mistaken for a missing one.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    genes: Vec<usize>,
    fitness: Option<f64>,
}

impl Chromosome {
    /// Builds a chromosome from lattice indices.
    ///
    /// # Errors
    /// Returns [`MemeticError::InvalidConfiguration`] if an index is out of
    /// range, the first gene is not the base view, or two genes share a label.
    pub fn new(lattice: &Lattice, genes: Vec<usize>) -> Result<Self> {
        check_genes(lattice, &genes)?;
        Ok(Self::from_genes(genes))
    }

    /// Wraps genes that the caller already knows are in range.
    pub(crate) fn from_genes(genes: Vec<usize>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Lattice indices of the selected views, base first.
    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if the chromosome holds no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Cached fitness, `None` until evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Stores an evaluated fitness.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Fitness for ranking; unevaluated chromosomes rank last.
    pub(crate) fn score(&self, objective: Objective) -> f64 {
        self.fitness.unwrap_or_else(|| objective.worst())
    }

    /// Resolves the genes to their views.
    pub fn views<'a>(&'a self, lattice: &'a Lattice) -> impl Iterator<Item = &'a View> + 'a {
        self.genes.iter().map(move |&g| lattice.view(g))
    }

    /// Labels of the selected views, in gene order.
    pub fn labels<'a>(&'a self, lattice: &'a Lattice) -> Vec<&'a str> {
        self.views(lattice).map(|v| v.label.as_str()).collect()
    }

    /// Returns `true` if the chromosome selects a view labelled `label`.
    pub fn contains_label(&self, lattice: &Lattice, label: &str) -> bool {
        self.views(lattice).any(|v| v.label == label)
    }

    /// Checks the chromosome invariants: base view in position 0 and no
    /// duplicated label.
    pub fn is_valid(&self, lattice: &Lattice) -> bool {
        match self.genes.first() {
            Some(&first) if lattice.label_id(first) == lattice.label_id(0) => {
                has_unique_labels(lattice, &self.genes)
            }
            _ => false,
        }
    }
}

/// Checks that `genes` index into `lattice`, start with the base view and
/// hold unique labels.
pub(crate) fn check_genes(lattice: &Lattice, genes: &[usize]) -> Result<()> {
    if let Some(&bad) = genes.iter().find(|&&g| g >= lattice.len()) {
        return Err(MemeticError::InvalidConfiguration(format!(
            "gene {bad} is outside a lattice of {} views",
            lattice.len()
        )));
    }
    let starts_with_base = genes
        .first()
        .is_some_and(|&first| lattice.label_id(first) == lattice.label_id(0));
    if !starts_with_base || !has_unique_labels(lattice, genes) {
        return Err(MemeticError::InvalidConfiguration(
            "chromosome must start with the base view and hold unique labels".into(),
        ));
    }
    Ok(())
}

/// Returns `true` if no two genes map to the same label.
pub(crate) fn has_unique_labels(lattice: &Lattice, genes: &[usize]) -> bool {
    let mut seen = vec![false; lattice.distinct_labels()];
    for &g in genes {
        let id = lattice.label_id(g);
        if seen[id] {
            return false;
        }
        seen[id] = true;
    }
    true
}
