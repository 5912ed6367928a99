//! Payslip entity - One payroll record per coach per calendar month.
//!
//! Uniqueness over (`user_id`, `month`, `year`) is enforced by the
//! generator's duplicate check before insertion. Derived fields obey
//! `total_deductions = cpf_contribution + other_deductions` and
//! `net_pay = gross_pay - total_deductions` after generation and after
//! every ledger mutation.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment status of a payslip
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PayslipStatus {
    /// Generated but not yet paid out
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid out
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Commission earned in one 7-day bucket of the month
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeekCommission {
    /// Bucket index, 1-5, anchored at day 1 of the month
    pub week: u32,
    /// Commission earned inside the bucket
    pub amount: f64,
}

/// Ordered per-week commission breakdown, stored as a JSON column.
/// Buckets with no sessions are omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct WeeklyBreakdown(pub Vec<WeekCommission>);

/// One ad-hoc deduction line on a payslip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeductionDetail {
    /// Identifier unique within the payslip
    pub id: i64,
    /// What the deduction is for
    pub description: String,
    /// Deducted amount; always positive
    pub amount: f64,
}

/// List of ad-hoc deductions, stored as a JSON column
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct DeductionList(pub Vec<DeductionDetail>);

/// Payslip database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payslips")]
pub struct Model {
    /// Unique identifier for the payslip
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Coach the payslip belongs to
    pub user_id: i64,
    /// Calendar month covered (1-12)
    pub month: i32,
    /// Calendar year covered
    pub year: i32,
    /// Employment basis the payslip was generated under
    pub employment_type: super::user::EmploymentType,
    /// Monthly base salary (0 for part-time coaches)
    pub base_salary: f64,
    /// Earnings from classes led (0 for full-time coaches)
    pub class_earnings: f64,
    /// Class hours led inside the month
    pub class_hours: f64,
    /// Hourly class rate applied
    pub class_rate_per_hour: f64,
    /// Total PT commission for the month
    pub pt_commission: f64,
    /// Number of payroll-eligible PT sessions
    pub pt_session_count: i32,
    /// Commission split into fixed 7-day buckets
    pub pt_weekly_breakdown: WeeklyBreakdown,
    /// Discretionary bonus
    pub bonus: f64,
    /// What the bonus is for
    pub bonus_description: Option<String>,
    /// Gross pay before deductions
    pub gross_pay: f64,
    /// Statutory CPF contribution
    pub cpf_contribution: f64,
    /// Sum of ad-hoc deductions
    pub other_deductions: f64,
    /// Ad-hoc deduction line items
    pub deduction_details: DeductionList,
    /// `cpf_contribution + other_deductions`
    pub total_deductions: f64,
    /// `gross_pay - total_deductions`
    pub net_pay: f64,
    /// Payment status
    pub status: PayslipStatus,
    /// Scheduled payment date at generation; actual date once paid
    pub payment_date: Option<Date>,
}

/// Defines relationships between payslips and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payslip belongs to one coach
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Coach,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coach.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
