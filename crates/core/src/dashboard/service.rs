//! Dashboard aggregation over expense records.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tally_shared::types::CollaboratorId;

use crate::calendar::Period;
use crate::collaborator::Collaborator;
use crate::expense::{
    ExpenseRecord, PaymentState, installment_label, is_visible, payment_state, will_count,
};

use super::preferences::{SortOrder, ViewPreferences};
use super::types::{
    CollaboratorSummary, ExpenseLine, MonthTotal, MonthlySummary, Totals, YearOverview,
};

/// Name of the group holding records whose collaborator is gone.
pub const UNASSIGNED_NAME: &str = "Unassigned";

/// Dashboard service for monthly and yearly views.
pub struct DashboardService;

impl DashboardService {
    /// Line for `record` in `period`.
    #[must_use]
    pub fn expense_line(record: &ExpenseRecord, period: Period) -> ExpenseLine {
        ExpenseLine {
            id: record.id,
            description: record.description.clone(),
            value: record.value,
            label: installment_label(record, period),
            status: record.status,
            counted: will_count(record, period),
            payment: payment_state(record, period),
        }
    }

    /// Groups the records visible in `period` by collaborator.
    ///
    /// Hidden collaborators are left out, totals included. Every other
    /// collaborator gets a group even when empty; records pointing at an
    /// unknown collaborator land in a trailing unassigned group.
    #[must_use]
    pub fn monthly_summary(
        records: &[ExpenseRecord],
        collaborators: &[Collaborator],
        period: Period,
        preferences: &ViewPreferences,
    ) -> MonthlySummary {
        let mut groups: Vec<CollaboratorSummary> = collaborators
            .iter()
            .filter(|c| !preferences.is_hidden(c.id))
            .map(|c| CollaboratorSummary {
                collaborator_id: Some(c.id),
                name: c.name.clone(),
                order_index: c.order_index,
                collapsed: preferences.is_collapsed(c.id),
                totals: Totals::default(),
                lines: Vec::new(),
            })
            .collect();
        let index: HashMap<CollaboratorId, usize> = groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| g.collaborator_id.map(|id| (id, i)))
            .collect();
        let known: HashSet<CollaboratorId> = collaborators.iter().map(|c| c.id).collect();

        let mut unassigned = CollaboratorSummary {
            collaborator_id: None,
            name: UNASSIGNED_NAME.to_string(),
            order_index: None,
            collapsed: false,
            totals: Totals::default(),
            lines: Vec::new(),
        };

        for record in records.iter().filter(|r| is_visible(r, period)) {
            let group = match index.get(&record.collaborator_id) {
                Some(&i) => &mut groups[i],
                None if known.contains(&record.collaborator_id) => continue,
                None => &mut unassigned,
            };
            let line = Self::expense_line(record, period);
            if line.counted {
                group
                    .totals
                    .add(line.value, line.payment == PaymentState::Paid);
            }
            group.lines.push(line);
        }

        Self::sort_groups(&mut groups, preferences.sort);
        if !unassigned.lines.is_empty() {
            groups.push(unassigned);
        }

        let mut totals = Totals::default();
        for group in &mut groups {
            group.lines.sort_by(|a, b| {
                a.description
                    .to_lowercase()
                    .cmp(&b.description.to_lowercase())
                    .then_with(|| a.id.cmp(&b.id))
            });
            totals.merge(&group.totals);
        }

        MonthlySummary {
            period,
            collaborators: groups,
            totals,
        }
    }

    /// Counted and paid totals for each month of `year`.
    #[must_use]
    pub fn year_overview(records: &[ExpenseRecord], year: i32) -> YearOverview {
        let months: Vec<MonthTotal> = Period::months_of_year(year)
            .into_iter()
            .map(|period| {
                let mut totals = Totals::default();
                for record in records.iter().filter(|r| will_count(r, period)) {
                    let paid = payment_state(record, period) == PaymentState::Paid;
                    totals.add(record.value, paid);
                }
                MonthTotal {
                    period,
                    total: totals.total,
                    paid_total: totals.paid_total,
                }
            })
            .collect();

        let total = months.iter().map(|m| m.total).sum::<Decimal>();
        let paid_total = months.iter().map(|m| m.paid_total).sum::<Decimal>();

        YearOverview {
            year,
            months,
            total,
            paid_total,
        }
    }

    fn sort_groups(groups: &mut [CollaboratorSummary], sort: SortOrder) {
        let by_name = |a: &CollaboratorSummary, b: &CollaboratorSummary| {
            a.name.to_lowercase().cmp(&b.name.to_lowercase())
        };
        match sort {
            SortOrder::Manual => groups.sort_by(|a, b| {
                match (a.order_index, b.order_index) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
                .then_with(|| by_name(a, b))
            }),
            SortOrder::Name => groups.sort_by(by_name),
            SortOrder::TotalDesc => groups.sort_by(|a, b| {
                b.totals
                    .total
                    .cmp(&a.totals.total)
                    .then_with(|| by_name(a, b))
            }),
        }
    }
}
