//! Admin console operations: paginated listing, search over the fetched
//! page, single record fetch, delete and the membership report.

mod member_report;
mod report;

pub use member_report::MemberReport;
pub use report::{build_report, format_inr, sum_prices, ReportDocument, ReportRow, CATEGORIES};

use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

use crate::gateway::{
    AdminGateway, AdminListItem, GatewayError, ListPage, ListQuery,
    SortDirection, SortField, Submission, PENDING_STATUS,
};

/// Outcome of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Paging and sort position of the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page_size: usize,
    pub skip: usize,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Pager {
    pub fn new(page_size: usize, sort_field: SortField, sort_direction: SortDirection) -> Self {
        Self {
            page_size: page_size.max(1),
            skip: 0,
            sort_field,
            sort_direction,
        }
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            limit: self.page_size,
            skip: self.skip,
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
        }
    }

    /// 1-based page number
    pub fn page_number(&self) -> usize {
        self.skip / self.page_size + 1
    }

    pub fn next_page(&mut self, page: &ListPage) -> bool {
        if !page.has_more {
            return false;
        }
        self.skip = self.skip.saturating_add(self.page_size);
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if self.skip == 0 {
            return false;
        }
        self.skip = self.skip.saturating_sub(self.page_size);
        true
    }

    /// Step back a page when the current one emptied out
    pub fn settle(&mut self, page: &ListPage) -> bool {
        if page.items.is_empty() && self.skip > 0 && self.skip >= page.total {
            self.previous_page()
        } else {
            false
        }
    }

    pub fn cycle_sort_field(&mut self) {
        self.sort_field = self.sort_field.next();
        self.skip = 0;
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_direction = self.sort_direction.toggle();
        self.skip = 0;
    }
}

/// Statistics shown above the listing, computed over the fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageStats {
    pub total_members: usize,
    pub pending: usize,
    pub revenue: i64,
    pub this_month: usize,
}

impl PageStats {
    pub fn compute(page: &ListPage, today: NaiveDate) -> Self {
        let items = &page.items;
        Self {
            total_members: page.total,
            pending: items.iter().filter(|i| i.status == PENDING_STATUS).count(),
            revenue: sum_prices(items.iter().map(|i| i.membership_price.as_str())),
            this_month: items
                .iter()
                .filter(|i| {
                    let date = i.submitted_at.date_naive();
                    date.year() == today.year() && date.month() == today.month()
                })
                .count(),
        }
    }
}

/// Items of the page whose name, email, membership id or city contains the
/// search term, ignoring case. Only the fetched page is searched.
pub fn filter_page<'a>(items: &'a [AdminListItem], term: &str) -> Vec<&'a AdminListItem> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            [&item.name, &item.email, &item.membership_id, &item.city]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}

/// Admin operations over a gateway
#[derive(Clone)]
pub struct AdminService {
    gateway: Arc<dyn AdminGateway>,
}

impl AdminService {
    pub fn new(gateway: Arc<dyn AdminGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: ListQuery) -> Result<ListPage, GatewayError> {
        let page = self.gateway.list(query).await?;
        info!(
            skip = query.skip,
            shown = page.items.len(),
            total = page.total,
            "admin page loaded"
        );
        Ok(page)
    }

    /// A full record, or `None` when the id is unknown
    pub async fn get(&self, id: &str) -> Result<Option<Submission>, GatewayError> {
        match self.gateway.get_one(id).await {
            Ok(submission) => Ok(Some(submission)),
            Err(GatewayError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a record. Unknown ids report `NotFound` instead of failing.
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome, GatewayError> {
        match self.gateway.delete(id).await {
            Ok(()) => {
                info!(id, "admin deleted membership");
                Ok(DeleteOutcome::Deleted)
            }
            Err(GatewayError::NotFound(_)) => {
                warn!(id, "delete of unknown membership");
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch up to `limit` rows from the start of the default ordering and
    /// build the printable report.
    pub async fn report(&self, limit: usize) -> Result<ReportDocument, GatewayError> {
        let page = self
            .gateway
            .list(ListQuery {
                limit,
                skip: 0,
                ..ListQuery::default()
            })
            .await?;
        info!(rows = page.items.len(), "report generated");
        Ok(build_report(&page.items))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gateway::MockAdminGateway;
    use chrono::{TimeZone, Utc};

    pub(crate) fn item(id: &str, name: &str, city: &str, price: &str) -> AdminListItem {
        AdminListItem {
            membership_id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            mobile: "9800000000".to_string(),
            membership_category: "gold".to_string(),
            membership_years: "3".to_string(),
            membership_price: price.to_string(),
            payment_mode: "credit_card".to_string(),
            status: PENDING_STATUS.to_string(),
            submitted_at: Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
            city: city.to_string(),
            state: "Goa".to_string(),
        }
    }

    mod test_search {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_matches_any_searchable_column() {
            let items = vec![
                item("CM001", "Asha Rao", "Panaji", "150000"),
                item("CM002", "Vikram Shah", "Mumbai", "500000"),
            ];
            let by_city: Vec<_> = filter_page(&items, "mumBAI")
                .iter()
                .map(|i| i.membership_id.as_str())
                .collect();
            assert_eq!(by_city, vec!["CM002"]);
            assert_eq!(filter_page(&items, "cm001").len(), 1);
            assert_eq!(filter_page(&items, "asha.rao@").len(), 1);
            assert_eq!(filter_page(&items, "  ").len(), 2);
            assert!(filter_page(&items, "delhi").is_empty());
        }
    }

    mod test_stats {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_stats_over_page() {
            let mut approved = item("CM002", "Vikram Shah", "Mumbai", "abc");
            approved.status = "approved".to_string();
            approved.submitted_at = Utc.with_ymd_and_hms(2024, 5, 30, 9, 0, 0).unwrap();
            let page = ListPage {
                items: vec![item("CM001", "Asha Rao", "Panaji", "150000"), approved],
                total: 42,
                has_more: true,
            };
            let stats =
                PageStats::compute(&page, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
            assert_eq!(
                stats,
                PageStats {
                    total_members: 42,
                    pending: 1,
                    revenue: 150000,
                    this_month: 1,
                }
            );
        }

        #[test]
        fn test_stats_revenue_saturates() {
            let page = ListPage {
                items: vec![
                    item("CM001", "Asha Rao", "Panaji", "9223372036854775807"),
                    item("CM002", "Vikram Shah", "Mumbai", "1000"),
                ],
                total: 2,
                has_more: false,
            };
            let stats =
                PageStats::compute(&page, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
            assert_eq!(stats.revenue, i64::MAX);
        }
    }

    mod test_pager {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_paging_honours_has_more() {
            let mut pager = Pager::new(10, SortField::default(), SortDirection::default());
            let full = ListPage {
                items: vec![],
                total: 25,
                has_more: true,
            };
            assert!(pager.next_page(&full));
            assert_eq!(pager.page_number(), 2);
            let last = ListPage {
                has_more: false,
                ..full.clone()
            };
            assert!(!pager.next_page(&last));
            assert!(pager.previous_page());
            assert!(!pager.previous_page());
        }

        #[test]
        fn test_sort_changes_restart_paging() {
            let mut pager = Pager::new(10, SortField::default(), SortDirection::default());
            pager.skip = 20;
            pager.cycle_sort_field();
            assert_eq!(pager.skip, 0);
            assert_eq!(pager.query().sort_field, SortField::FirstName);
            pager.skip = 10;
            pager.toggle_sort_direction();
            assert_eq!(pager.query().sort_direction, SortDirection::Asc);
            assert_eq!(pager.skip, 0);
        }

        #[test]
        fn test_settle_steps_back_from_emptied_page() {
            let mut pager = Pager::new(10, SortField::default(), SortDirection::default());
            pager.skip = 20;
            let emptied = ListPage {
                items: vec![],
                total: 20,
                has_more: false,
            };
            assert!(pager.settle(&emptied));
            assert_eq!(pager.skip, 10);
        }
    }

    mod test_service {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_delete_unknown_reports_not_found() {
            let mut gateway = MockAdminGateway::new();
            gateway
                .expect_delete()
                .times(1)
                .returning(|id| Err(GatewayError::NotFound(id.to_string())));
            let service = AdminService::new(Arc::new(gateway));
            assert_eq!(
                service.delete("CM404").await,
                Ok(DeleteOutcome::NotFound)
            );
        }

        #[tokio::test]
        async fn test_get_maps_not_found_to_none() {
            let mut gateway = MockAdminGateway::new();
            gateway
                .expect_get_one()
                .returning(|id| Err(GatewayError::NotFound(id.to_string())));
            let service = AdminService::new(Arc::new(gateway));
            assert_eq!(service.get("CM404").await, Ok(None));
        }

        #[tokio::test]
        async fn test_storage_errors_propagate() {
            let mut gateway = MockAdminGateway::new();
            gateway
                .expect_delete()
                .returning(|_| Err(GatewayError::Storage("read-only".into())));
            let service = AdminService::new(Arc::new(gateway));
            tokio_test::assert_err!(service.delete("CM001").await);
        }

        #[tokio::test]
        async fn test_report_fetches_from_offset_zero() {
            let mut gateway = MockAdminGateway::new();
            gateway
                .expect_list()
                .withf(|q| q.limit == 1000 && q.skip == 0 && q.sort_field == SortField::SubmittedAt)
                .times(1)
                .returning(|q| {
                    Ok(ListPage::new(
                        vec![item("CM001", "Asha Rao", "Panaji", "150000")],
                        &q,
                        1,
                    ))
                });
            let service = AdminService::new(Arc::new(gateway));
            let report = service.report(1000).await.unwrap();
            assert_eq!(report.rows.len(), 1);
            assert_eq!(report.total_revenue, 150000);
        }
    }
}
