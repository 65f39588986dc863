//! Invalidation planning.
//!
//! Each catalog mutation maps to the complete set of cache keys whose value it
//! may have changed: the entity itself, the collections that list it, and the
//! parent and grandparent entries whose counts move with it.

use std::collections::BTreeSet;
use std::fmt;

use uuid::Uuid;

use super::keys::CacheKey;

/// A committed write to the catalog, carrying every id the invalidation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogMutation {
    MenuCreated {
        menu_id: Uuid,
    },
    MenuUpdated {
        menu_id: Uuid,
    },
    MenuDeleted {
        menu_id: Uuid,
        submenu_ids: Vec<Uuid>,
        dish_ids: Vec<Uuid>,
    },
    SubmenuCreated {
        menu_id: Uuid,
        submenu_id: Uuid,
    },
    SubmenuUpdated {
        menu_id: Uuid,
        submenu_id: Uuid,
    },
    SubmenuDeleted {
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_ids: Vec<Uuid>,
    },
    DishCreated {
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    },
    DishUpdated {
        submenu_id: Uuid,
        dish_id: Uuid,
    },
    DishDeleted {
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    },
    CatalogCleared,
}

impl CatalogMutation {
    pub fn name(&self) -> &'static str {
        match self {
            CatalogMutation::MenuCreated { .. } => "menu_created",
            CatalogMutation::MenuUpdated { .. } => "menu_updated",
            CatalogMutation::MenuDeleted { .. } => "menu_deleted",
            CatalogMutation::SubmenuCreated { .. } => "submenu_created",
            CatalogMutation::SubmenuUpdated { .. } => "submenu_updated",
            CatalogMutation::SubmenuDeleted { .. } => "submenu_deleted",
            CatalogMutation::DishCreated { .. } => "dish_created",
            CatalogMutation::DishUpdated { .. } => "dish_updated",
            CatalogMutation::DishDeleted { .. } => "dish_deleted",
            CatalogMutation::CatalogCleared => "catalog_cleared",
        }
    }
}

/// Keys to delete for one or more mutations. `flush` drops the whole namespace.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InvalidationPlan {
    pub keys: BTreeSet<CacheKey>,
    pub flush: bool,
}

impl InvalidationPlan {
    pub fn for_mutation(mutation: &CatalogMutation) -> Self {
        let mut plan = Self::default();
        plan.add(mutation);
        plan
    }

    /// Merge several mutations into one plan, deduplicating shared keys.
    pub fn from_mutations<'a>(mutations: impl IntoIterator<Item = &'a CatalogMutation>) -> Self {
        let mut plan = Self::default();
        for mutation in mutations {
            plan.add(mutation);
        }
        plan
    }

    fn add(&mut self, mutation: &CatalogMutation) {
        let keys = &mut self.keys;
        match mutation {
            CatalogMutation::MenuCreated { .. } => {
                keys.insert(CacheKey::menu_list());
            }
            CatalogMutation::MenuUpdated { menu_id } => {
                keys.insert(CacheKey::menu_list());
                keys.insert(CacheKey::menu(*menu_id));
            }
            CatalogMutation::MenuDeleted {
                menu_id,
                submenu_ids,
                dish_ids,
            } => {
                keys.insert(CacheKey::menu_list());
                keys.insert(CacheKey::menu(*menu_id));
                keys.insert(CacheKey::submenu_list(*menu_id));
                for submenu_id in submenu_ids {
                    keys.insert(CacheKey::submenu(*submenu_id));
                    keys.insert(CacheKey::dish_list(*submenu_id));
                }
                for dish_id in dish_ids {
                    keys.insert(CacheKey::dish(*dish_id));
                }
            }
            CatalogMutation::SubmenuCreated { menu_id, .. } => {
                keys.insert(CacheKey::submenu_list(*menu_id));
                keys.insert(CacheKey::menu(*menu_id));
                keys.insert(CacheKey::menu_list());
            }
            CatalogMutation::SubmenuUpdated {
                menu_id,
                submenu_id,
            } => {
                keys.insert(CacheKey::submenu_list(*menu_id));
                keys.insert(CacheKey::submenu(*submenu_id));
            }
            CatalogMutation::SubmenuDeleted {
                menu_id,
                submenu_id,
                dish_ids,
            } => {
                keys.insert(CacheKey::submenu_list(*menu_id));
                keys.insert(CacheKey::submenu(*submenu_id));
                keys.insert(CacheKey::dish_list(*submenu_id));
                keys.insert(CacheKey::menu(*menu_id));
                keys.insert(CacheKey::menu_list());
                for dish_id in dish_ids {
                    keys.insert(CacheKey::dish(*dish_id));
                }
            }
            CatalogMutation::DishCreated {
                menu_id,
                submenu_id,
                ..
            } => {
                Self::add_dish_ancestors(keys, *menu_id, *submenu_id);
            }
            CatalogMutation::DishUpdated {
                submenu_id,
                dish_id,
            } => {
                keys.insert(CacheKey::dish_list(*submenu_id));
                keys.insert(CacheKey::dish(*dish_id));
            }
            CatalogMutation::DishDeleted {
                menu_id,
                submenu_id,
                dish_id,
            } => {
                Self::add_dish_ancestors(keys, *menu_id, *submenu_id);
                keys.insert(CacheKey::dish(*dish_id));
            }
            CatalogMutation::CatalogCleared => {
                self.flush = true;
            }
        }

        // The whole-catalog view embeds every entity.
        if !self.flush {
            self.keys.insert(CacheKey::menu_tree());
        }
    }

    fn add_dish_ancestors(keys: &mut BTreeSet<CacheKey>, menu_id: Uuid, submenu_id: Uuid) {
        keys.insert(CacheKey::dish_list(submenu_id));
        keys.insert(CacheKey::submenu(submenu_id));
        keys.insert(CacheKey::submenu_list(menu_id));
        keys.insert(CacheKey::menu(menu_id));
        keys.insert(CacheKey::menu_list());
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && !self.flush
    }

    pub fn rendered_keys(&self) -> Vec<String> {
        self.keys.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for InvalidationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InvalidationPlan {{ keys: {}, flush: {} }}",
            self.keys.len(),
            self.flush
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_keys(mutation: CatalogMutation) -> BTreeSet<CacheKey> {
        InvalidationPlan::for_mutation(&mutation).keys
    }

    #[test]
    fn menu_create_clears_list_and_tree() {
        let keys = plan_keys(CatalogMutation::MenuCreated {
            menu_id: Uuid::new_v4(),
        });
        assert_eq!(
            keys,
            BTreeSet::from([CacheKey::menu_list(), CacheKey::menu_tree()])
        );
    }

    #[test]
    fn submenu_create_touches_parent_menu() {
        let menu_id = Uuid::new_v4();
        let keys = plan_keys(CatalogMutation::SubmenuCreated {
            menu_id,
            submenu_id: Uuid::new_v4(),
        });
        assert!(keys.contains(&CacheKey::menu(menu_id)));
        assert!(keys.contains(&CacheKey::menu_list()));
        assert!(keys.contains(&CacheKey::submenu_list(menu_id)));
    }

    #[test]
    fn dish_create_touches_submenu_and_menu() {
        let menu_id = Uuid::new_v4();
        let submenu_id = Uuid::new_v4();
        let keys = plan_keys(CatalogMutation::DishCreated {
            menu_id,
            submenu_id,
            dish_id: Uuid::new_v4(),
        });
        for key in [
            CacheKey::dish_list(submenu_id),
            CacheKey::submenu(submenu_id),
            CacheKey::submenu_list(menu_id),
            CacheKey::menu(menu_id),
            CacheKey::menu_list(),
            CacheKey::menu_tree(),
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn submenu_delete_clears_child_dishes() {
        let menu_id = Uuid::new_v4();
        let submenu_id = Uuid::new_v4();
        let dishes = [Uuid::new_v4(), Uuid::new_v4()];
        let keys = plan_keys(CatalogMutation::SubmenuDeleted {
            menu_id,
            submenu_id,
            dish_ids: dishes.to_vec(),
        });
        assert!(keys.contains(&CacheKey::dish_list(submenu_id)));
        assert!(keys.contains(&CacheKey::dish(dishes[0])));
        assert!(keys.contains(&CacheKey::dish(dishes[1])));
        assert!(keys.contains(&CacheKey::menu(menu_id)));
    }

    #[test]
    fn menu_delete_clears_every_descendant() {
        let menu_id = Uuid::new_v4();
        let submenu_id = Uuid::new_v4();
        let dish_id = Uuid::new_v4();
        let keys = plan_keys(CatalogMutation::MenuDeleted {
            menu_id,
            submenu_ids: vec![submenu_id],
            dish_ids: vec![dish_id],
        });
        assert!(keys.contains(&CacheKey::submenu_list(menu_id)));
        assert!(keys.contains(&CacheKey::submenu(submenu_id)));
        assert!(keys.contains(&CacheKey::dish_list(submenu_id)));
        assert!(keys.contains(&CacheKey::dish(dish_id)));
    }

    #[test]
    fn dish_update_leaves_counts_alone() {
        let submenu_id = Uuid::new_v4();
        let keys = plan_keys(CatalogMutation::DishUpdated {
            submenu_id,
            dish_id: Uuid::new_v4(),
        });
        assert!(!keys.contains(&CacheKey::submenu(submenu_id)));
        assert!(!keys.contains(&CacheKey::menu_list()));
    }

    #[test]
    fn clear_flushes_namespace() {
        let plan = InvalidationPlan::for_mutation(&CatalogMutation::CatalogCleared);
        assert!(plan.flush);
        assert!(plan.keys.is_empty());
        assert!(!plan.is_empty());
    }

    #[test]
    fn merged_plan_deduplicates() {
        let menu_id = Uuid::new_v4();
        let mutations = [
            CatalogMutation::MenuUpdated { menu_id },
            CatalogMutation::MenuCreated {
                menu_id: Uuid::new_v4(),
            },
        ];
        let plan = InvalidationPlan::from_mutations(&mutations);
        assert_eq!(plan.keys.len(), 3);
        assert_eq!(plan.to_string(), "InvalidationPlan { keys: 3, flush: false }");
    }
}
