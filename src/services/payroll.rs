// src/services/payroll.rs

use crate::{
    errors::{AppError, AppResult},
    models::{PayPeriod, Payslip, PayslipAmounts, PayslipView, Profile, Salary, User},
    store::HrStore,
};
use chrono::{Datelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Payslip figures are kept at cent precision, matching `NUMERIC(14,2)`.
const MONEY_SCALE: u32 = 2;

pub struct PayrollService;

/// What a run should do with an employee's existing payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayslipAction {
    Create,
    Resync(Uuid),
    /// Figures already match.
    Keep,
    /// Paid payslips are never rewritten.
    Frozen,
}

/// Per-run counters, logged when the run finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub eligible: usize,
    pub skipped: usize,
    pub created: usize,
    pub resynced: usize,
    pub unchanged: usize,
    pub frozen: usize,
}

impl GenerationReport {
    pub fn writes(&self) -> usize {
        self.created + self.resynced
    }
}

fn to_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

impl PayrollService {
    /// Computes an employee's figures for `period`.
    ///
    /// Returns `None` when the employee joined after the period and must not
    /// get a payslip for it. A missing salary record counts as zero; a missing
    /// profile or joining date means a full month.
    pub fn calculate(
        salary: Option<&Salary>,
        profile: Option<&Profile>,
        period: PayPeriod,
    ) -> Option<PayslipAmounts> {
        let joined = profile.and_then(|p| p.date_of_joining);

        if let Some(date) = joined {
            if PayPeriod::of(date) > period {
                return None;
            }
        }

        let base_salary = to_money(salary.map(|s| s.base_salary).unwrap_or(dec!(0)));

        let net_pay = match joined {
            Some(date) if period.contains(date) => {
                let days_in_month = i64::from(period.days_in_month());
                let days_worked = days_in_month - i64::from(date.day()) + 1;
                if days_worked <= 0 || days_in_month <= 0 {
                    dec!(0)
                } else {
                    to_money(base_salary * Decimal::from(days_worked) / Decimal::from(days_in_month))
                }
            }
            _ => base_salary,
        };

        Some(PayslipAmounts {
            base_salary,
            net_pay,
        })
    }

    /// Decides the upsert step against whatever payslip already exists.
    pub fn reconcile(existing: Option<&Payslip>, amounts: PayslipAmounts) -> PayslipAction {
        match existing {
            None => PayslipAction::Create,
            Some(p) if !p.status.accepts_regeneration() => PayslipAction::Frozen,
            Some(p) if p.amounts() == amounts => PayslipAction::Keep,
            Some(p) => PayslipAction::Resync(p.id),
        }
    }
}

/// Generates or refreshes the payslips of every approved employee for
/// `period`, then returns all payslips on file for it.
///
/// Employees are processed one after another and each write commits on its
/// own: a failure part-way leaves earlier employees' payslips in place.
pub async fn generate_payroll(
    store: &dyn HrStore,
    period: PayPeriod,
) -> AppResult<(Vec<PayslipView>, GenerationReport)> {
    info!(%period, "Starting payroll generation");

    let employees: Vec<User> = store
        .list_payroll_employees()
        .await?
        .into_iter()
        .filter(User::is_payroll_eligible)
        .collect();
    let mut report = GenerationReport {
        eligible: employees.len(),
        ..Default::default()
    };
    debug!(%period, count = employees.len(), "Found approved employees");

    for employee in &employees {
        process_employee(store, employee, period, &mut report).await?;
    }

    let payslips = store.list_payslips(period).await?;

    info!(
        %period,
        eligible = report.eligible,
        skipped = report.skipped,
        created = report.created,
        resynced = report.resynced,
        unchanged = report.unchanged,
        frozen = report.frozen,
        writes = report.writes(),
        returned = payslips.len(),
        "Payroll generation complete"
    );

    Ok((payslips, report))
}

async fn process_employee(
    store: &dyn HrStore,
    employee: &User,
    period: PayPeriod,
    report: &mut GenerationReport,
) -> AppResult<()> {
    let profile = store.find_profile(employee.id).await?;
    let salary = store.find_salary(employee.id).await?;

    let Some(amounts) = PayrollService::calculate(salary.as_ref(), profile.as_ref(), period) else {
        debug!(employee = %employee.id, "Skipped: joins after the period");
        report.skipped += 1;
        return Ok(());
    };

    let mut existing = store.find_payslip(employee.id, period).await?;

    if existing.is_none() {
        if store.insert_payslip(employee.id, period, amounts).await?.is_some() {
            debug!(employee = %employee.id, net_pay = %amounts.net_pay, "Created payslip");
            report.created += 1;
            return Ok(());
        }
        // another run created it between our read and insert
        existing = store.find_payslip(employee.id, period).await?;
    }

    match PayrollService::reconcile(existing.as_ref(), amounts) {
        PayslipAction::Resync(id) => {
            if store.resync_payslip(id, amounts).await?.is_some() {
                debug!(employee = %employee.id, net_pay = %amounts.net_pay, "Resynced pending payslip");
                report.resynced += 1;
            } else {
                // paid in the meantime
                report.frozen += 1;
            }
        }
        PayslipAction::Keep => report.unchanged += 1,
        PayslipAction::Frozen => {
            debug!(employee = %employee.id, "Payslip already paid; left untouched");
            report.frozen += 1;
        }
        PayslipAction::Create => {
            // the conflicting row was deleted again, most likely with its employee
            warn!(employee = %employee.id, %period, "Payslip vanished during generation; skipped");
            report.skipped += 1;
        }
    }

    Ok(())
}

/// Moves a payslip to `Paid` and stamps the payment time. Re-marking a paid
/// payslip only refreshes `paidOn`.
pub async fn mark_paid(store: &dyn HrStore, payslip_id: Uuid) -> AppResult<PayslipView> {
    let payslip = store
        .mark_payslip_paid(payslip_id, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payslip {} not found", payslip_id)))?;

    info!(payslip = %payslip.id, employee = %payslip.user.user_id, "Payslip marked as paid");
    Ok(payslip)
}
