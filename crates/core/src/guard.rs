//! Category deletion safety.
//!
//! A category cannot be removed while products still reference it. The
//! check is pure: the caller supplies the current referencing-product
//! count and acts on the verdict. The count-then-delete sequence is not
//! atomic against concurrent product creation; the guard is best-effort
//! by design.

use crate::error::CoreError;
use crate::types::DbId;

/// Outcome of checking whether a category can safely be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DeletionCheck {
    /// Whether the category has zero referencing products.
    pub is_safe: bool,
    /// Number of products that reference this category.
    pub dependent_count: i64,
}

/// Evaluate whether a category with the given number of referencing
/// products can be deleted.
pub fn check_category_delete(product_count: i64) -> DeletionCheck {
    DeletionCheck {
        is_safe: product_count == 0,
        dependent_count: product_count,
    }
}

impl DeletionCheck {
    /// Convert a blocked check into the error surfaced to callers.
    pub fn into_result(self, category_id: DbId) -> Result<(), CoreError> {
        if self.is_safe {
            Ok(())
        } else {
            Err(CoreError::HasDependents {
                entity: "Category",
                id: category_id,
                dependents: self.dependent_count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn zero_products_is_safe() {
        let check = check_category_delete(0);
        assert!(check.is_safe);
        assert!(check.into_result(7).is_ok());
    }

    #[test]
    fn referencing_products_block_deletion() {
        let check = check_category_delete(3);
        assert!(!check.is_safe);
        assert_eq!(check.dependent_count, 3);
        assert_matches!(
            check.into_result(7),
            Err(CoreError::HasDependents {
                entity: "Category",
                id: 7,
                dependents: 3,
            })
        );
    }
}
