//! Derived counts.
//!
//! Counts are never stored: every assembled response asks the store for the
//! live number of child rows. Only the finished response is cached.

use std::sync::Arc;

use carta_api_types::{MenuResponse, SubmenuResponse};
use futures::future::try_join_all;
use uuid::Uuid;

use crate::application::repos::{CountsRepo, RepoError};
use crate::domain::entities::{MenuRecord, SubmenuRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuCounts {
    pub submenus: u64,
    pub dishes: u64,
}

#[derive(Clone)]
pub struct AggregationService {
    counts: Arc<dyn CountsRepo>,
}

impl AggregationService {
    pub fn new(counts: Arc<dyn CountsRepo>) -> Self {
        Self { counts }
    }

    pub async fn menu_counts(&self, menu_id: Uuid) -> Result<MenuCounts, RepoError> {
        let (submenus, dishes) = tokio::try_join!(
            self.counts.count_submenus_in_menu(menu_id),
            self.counts.count_dishes_in_menu(menu_id),
        )?;
        Ok(MenuCounts { submenus, dishes })
    }

    pub async fn submenu_dish_count(&self, submenu_id: Uuid) -> Result<u64, RepoError> {
        self.counts.count_dishes_in_submenu(submenu_id).await
    }

    pub async fn menu_response(&self, record: MenuRecord) -> Result<MenuResponse, RepoError> {
        let counts = self.menu_counts(record.id).await?;
        Ok(MenuResponse {
            id: record.id,
            title: record.title,
            description: record.description,
            submenus_count: counts.submenus,
            dishes_count: counts.dishes,
        })
    }

    pub async fn menu_responses(
        &self,
        records: Vec<MenuRecord>,
    ) -> Result<Vec<MenuResponse>, RepoError> {
        try_join_all(records.into_iter().map(|record| self.menu_response(record))).await
    }

    pub async fn submenu_response(
        &self,
        record: SubmenuRecord,
    ) -> Result<SubmenuResponse, RepoError> {
        let dishes_count = self.submenu_dish_count(record.id).await?;
        Ok(SubmenuResponse {
            id: record.id,
            title: record.title,
            description: record.description,
            dishes_count,
        })
    }

    pub async fn submenu_responses(
        &self,
        records: Vec<SubmenuRecord>,
    ) -> Result<Vec<SubmenuResponse>, RepoError> {
        try_join_all(
            records
                .into_iter()
                .map(|record| self.submenu_response(record)),
        )
        .await
    }
}
