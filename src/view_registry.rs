use std::sync::Arc;
use std::time::Duration;

use log::debug;
use moka::future::Cache;
use uuid::Uuid;

use crate::pagination::PaginationController;

pub const VIEW_COOKIE: &str = "portal_view";

pub struct ViewRegistry {
    views: Cache<String, Arc<PaginationController>>,
    fetch_timeout: Duration,
}

impl ViewRegistry {
    pub fn new(idle: Duration, max_views: u64, fetch_timeout: Duration) -> Self {
        let views = Cache::builder()
            .max_capacity(max_views)
            .time_to_idle(idle)
            .build();

        Self { views, fetch_timeout }
    }

    pub fn get(&self, view_id: &str) -> Option<Arc<PaginationController>> {
        self.views.get(view_id)
    }

    pub async fn get_or_create(&self, view_id: Option<&str>) -> (String, Arc<PaginationController>) {
        if let Some(view_id) = view_id {
            if let Some(controller) = self.views.get(view_id) {
                return (view_id.to_string(), controller);
            }
        }

        let view_id = Uuid::new_v4().to_string();
        let controller = Arc::new(PaginationController::new(self.fetch_timeout));
        self.views.insert(view_id.clone(), controller.clone()).await;
        debug!("opened view {}", view_id);

        (view_id, controller)
    }

    pub fn view_cookie(view_id: &str) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", VIEW_COOKIE, view_id)
    }
}
