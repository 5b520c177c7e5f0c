//! Ordered batch plan for applying an [`EditScript`].
//!
//! UI batch-update primitives remove at pre-update coordinates and insert
//! at post-update coordinates. The steps come out in the order they must be
//! issued within one batch: item deletes, section deletes, item reloads,
//! section reloads, section inserts, item inserts.

use crate::script::{EditScript, ItemPath};
use crate::validate::Side;
use core::fmt;
use facet::Facet;

/// One call into the consumer's batch-update API.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum BatchStep {
    /// Remove items, OLD coordinates.
    DeleteItems { paths: Vec<ItemPath> },
    /// Remove sections, OLD coordinates.
    DeleteSections { sections: Vec<usize> },
    /// Reload items, OLD coordinates.
    ReloadItems { paths: Vec<ItemPath> },
    /// Reload whole sections, OLD coordinates.
    ReloadSections { sections: Vec<usize> },
    /// Insert sections, NEW coordinates.
    InsertSections { sections: Vec<usize> },
    /// Insert items, NEW coordinates.
    InsertItems { paths: Vec<ItemPath> },
}

impl BatchStep {
    /// Which snapshot this step's coordinates refer to.
    pub fn frame(&self) -> Side {
        match self {
            BatchStep::DeleteItems { .. }
            | BatchStep::DeleteSections { .. }
            | BatchStep::ReloadItems { .. }
            | BatchStep::ReloadSections { .. } => Side::Old,
            BatchStep::InsertSections { .. } | BatchStep::InsertItems { .. } => Side::New,
        }
    }

    /// Number of coordinates in this step.
    pub fn len(&self) -> usize {
        match self {
            BatchStep::DeleteItems { paths }
            | BatchStep::ReloadItems { paths }
            | BatchStep::InsertItems { paths } => paths.len(),
            BatchStep::DeleteSections { sections }
            | BatchStep::ReloadSections { sections }
            | BatchStep::InsertSections { sections } => sections.len(),
        }
    }

    /// Whether this step carries no coordinates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for BatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchStep::DeleteItems { .. } => "DeleteItems",
            BatchStep::DeleteSections { .. } => "DeleteSections",
            BatchStep::ReloadItems { .. } => "ReloadItems",
            BatchStep::ReloadSections { .. } => "ReloadSections",
            BatchStep::InsertSections { .. } => "InsertSections",
            BatchStep::InsertItems { .. } => "InsertItems",
        };
        write!(f, "{}({} @{})", name, self.len(), self.frame())
    }
}

impl EditScript {
    /// The non-empty steps of this script, in issue order.
    pub fn batch_steps(&self) -> Vec<BatchStep> {
        let candidates = [
            BatchStep::DeleteItems {
                paths: self.deleted_items.iter().copied().collect(),
            },
            BatchStep::DeleteSections {
                sections: self.deleted_sections.iter().copied().collect(),
            },
            BatchStep::ReloadItems {
                paths: self.updated_items.iter().copied().collect(),
            },
            BatchStep::ReloadSections {
                sections: self.updated_sections.iter().copied().collect(),
            },
            BatchStep::InsertSections {
                sections: self.inserted_sections.iter().copied().collect(),
            },
            BatchStep::InsertItems {
                paths: self.inserted_items.iter().copied().collect(),
            },
        ];
        candidates
            .into_iter()
            .filter(|step| !step.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_steps_follow_issue_order() {
        let script = EditScript {
            inserted_items: [ItemPath::new(0, 2)].into(),
            inserted_sections: [3].into(),
            updated_sections: [1].into(),
            updated_items: [ItemPath::new(0, 0)].into(),
            deleted_sections: [2].into(),
            deleted_items: [ItemPath::new(0, 1)].into(),
        };
        let steps = script.batch_steps();
        let names: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            [
                "DeleteItems(1 @old)",
                "DeleteSections(1 @old)",
                "ReloadItems(1 @old)",
                "ReloadSections(1 @old)",
                "InsertSections(1 @new)",
                "InsertItems(1 @new)",
            ]
        );
    }

    #[test]
    fn test_empty_steps_are_skipped() {
        let script = EditScript {
            deleted_sections: [0, 1].into(),
            inserted_sections: [1, 0].into(),
            ..EditScript::default()
        };
        assert_eq!(
            script.batch_steps(),
            vec![
                BatchStep::DeleteSections {
                    sections: vec![0, 1]
                },
                BatchStep::InsertSections {
                    sections: vec![0, 1]
                },
            ]
        );
    }

    #[test]
    fn test_paths_are_ascending() {
        let script = EditScript {
            updated_items: [ItemPath::new(1, 0), ItemPath::new(0, 3), ItemPath::new(0, 1)].into(),
            ..EditScript::default()
        };
        assert_eq!(
            script.batch_steps(),
            vec![BatchStep::ReloadItems {
                paths: vec![
                    ItemPath::new(0, 1),
                    ItemPath::new(0, 3),
                    ItemPath::new(1, 0)
                ]
            }]
        );
    }

    #[test]
    fn test_frames() {
        assert_eq!(
            BatchStep::ReloadSections { sections: vec![] }.frame(),
            Side::Old
        );
        assert_eq!(BatchStep::InsertItems { paths: vec![] }.frame(), Side::New);
    }
}
