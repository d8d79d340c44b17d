//! Deduplicated model set for one destination file.

use indexmap::IndexMap;
use spicemerge_parser::{Model, latin1_uppercase};

use crate::compare::{Comparison, compare};

/// What happened to a model handed to [`ModelGroup::insert`].
///
/// `index` is the position of the affected variant in its name bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// First model with this name.
    Inserted,
    /// Dropped, identical to a retained variant.
    Identical { index: usize },
    /// Replaced a less complete retained variant.
    Replaced { index: usize },
    /// Dropped, a retained variant is more complete.
    Kept { index: usize },
    /// Differs from every retained variant; appended as a new one.
    Variant { index: usize },
}

/// Models bucketed by name, each bucket holding mutually different variants.
///
/// Buckets and variants keep insertion order, which decides the `_` suffix a
/// variant gets when serialized.
#[derive(Debug, Clone, Default)]
pub struct ModelGroup {
    buckets: IndexMap<String, Vec<Model>>,
}

impl ModelGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one model into its name bucket.
    ///
    /// The model is compared with each retained variant in order and the first
    /// decisive comparison wins. If every variant is different, the model is
    /// appended.
    pub fn insert(&mut self, model: Model) -> MergeDecision {
        let bucket = self.buckets.entry(model.name().to_owned()).or_default();
        if bucket.is_empty() {
            bucket.push(model);
            return MergeDecision::Inserted;
        }

        for (index, retained) in bucket.iter_mut().enumerate() {
            match compare(retained, &model) {
                Comparison::Same => return MergeDecision::Identical { index },
                Comparison::RefMoreComplete => return MergeDecision::Kept { index },
                Comparison::OtherMoreComplete => {
                    *retained = model;
                    return MergeDecision::Replaced { index };
                }
                Comparison::Different => {}
            }
        }

        bucket.push(model);
        MergeDecision::Variant {
            index: bucket.len() - 1,
        }
    }

    /// Retained variants of `name` (case-insensitive), in retention order.
    pub fn variants(&self, name: &str) -> &[Model] {
        self.buckets
            .get(&latin1_uppercase(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct model names.
    pub fn num_names(&self) -> usize {
        self.buckets.len()
    }

    /// Number of retained models across all names.
    pub fn num_models(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Serialize to sorted `.model` lines.
    ///
    /// The n-th variant of a name gets n underscores appended to the name, so
    /// parsing the output again maps every variant back to the same bucket.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .buckets
            .iter()
            .flat_map(|(name, bucket)| {
                bucket.iter().enumerate().map(move |(index, model)| {
                    format!(".model {}{} {}", name, "_".repeat(index), model.definition())
                })
            })
            .collect();
        lines.sort();
        lines
    }
}

impl Extend<Model> for ModelGroup {
    fn extend<I: IntoIterator<Item = Model>>(&mut self, models: I) {
        for model in models {
            self.insert(model);
        }
    }
}

impl FromIterator<Model> for ModelGroup {
    fn from_iter<I: IntoIterator<Item = Model>>(models: I) -> Self {
        let mut group = Self::new();
        group.extend(models);
        group
    }
}

/// Merge `models` into `group`, in order, recording one decision per model.
pub fn merge<I>(mut group: ModelGroup, models: I) -> (ModelGroup, Vec<MergeDecision>)
where
    I: IntoIterator<Item = Model>,
{
    let decisions = models
        .into_iter()
        .map(|model| group.insert(model))
        .collect();
    (group, decisions)
}
