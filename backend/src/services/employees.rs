//! Employee service: shifts, tiered daily pay and payroll settlement
//!
//! Checking out prices the shift under the tier table and accrues the
//! result onto the employee's running balance. Cutting a payroll sums
//! the unsettled shifts in the period, links them, and resets the
//! balance, all in one transaction.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Attendance;
use shared::types::local_date;

/// Employee service
#[derive(Clone)]
pub struct EmployeeService {
    db: PgPool,
}

/// Employee record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmployeeRecord {
    pub id: Uuid,
    pub name: String,
    pub daily_salary: i64,
    pub current_balance: i64,
}

/// Input for adding an employee
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeInput {
    pub name: String,
    pub daily_salary: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeInput {
    pub name: Option<String>,
    pub daily_salary: Option<i64>,
}

/// Attendance row as stored
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub store_id: Option<Uuid>,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub payroll_id: Option<Uuid>,
}

impl AttendanceRecord {
    fn to_model(&self) -> Attendance {
        Attendance {
            id: self.id,
            employee_id: self.employee_id,
            store_id: self.store_id,
            check_in: self.check_in,
            check_out: self.check_out,
            payroll_id: self.payroll_id,
        }
    }
}

/// Attendance with derived hours, for the timesheet view
#[derive(Debug, Serialize)]
pub struct AttendanceView {
    #[serde(flatten)]
    pub attendance: AttendanceRecord,
    pub hours_worked: f64,
    pub salary_earned: i64,
}

/// Payroll record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PayrollRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub total_paid: Option<i64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_paid: bool,
}

/// Preview of the next payroll before it is cut
#[derive(Debug, Serialize)]
pub struct PayrollSummary {
    pub employee_id: Uuid,
    pub period_start: Option<NaiveDate>,
    pub period_end: NaiveDate,
    pub shift_count: i64,
    pub total_due: i64,
}

impl EmployeeService {
    /// Create a new EmployeeService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List employees
    pub async fn list_employees(&self) -> AppResult<Vec<EmployeeRecord>> {
        let employees = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT id, name, daily_salary, current_balance FROM employees ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(employees)
    }

    /// Get an employee
    pub async fn get_employee(&self, employee_id: Uuid) -> AppResult<EmployeeRecord> {
        let employee = sqlx::query_as::<_, EmployeeRecord>(
            "SELECT id, name, daily_salary, current_balance FROM employees WHERE id = $1",
        )
        .bind(employee_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

        Ok(employee)
    }

    /// Add an employee
    pub async fn create_employee(&self, input: CreateEmployeeInput) -> AppResult<EmployeeRecord> {
        if input.daily_salary < 0 {
            return Err(AppError::Validation {
                field: "daily_salary".to_string(),
                message: "Daily salary cannot be negative".to_string(),
            });
        }

        let employee = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            INSERT INTO employees (name, daily_salary)
            VALUES ($1, $2)
            RETURNING id, name, daily_salary, current_balance
            "#,
        )
        .bind(input.name.trim())
        .bind(input.daily_salary)
        .fetch_one(&self.db)
        .await?;

        Ok(employee)
    }

    /// Update an employee's name or rate. The rate change applies to
    /// shifts checked out after it, not retroactively.
    pub async fn update_employee(
        &self,
        employee_id: Uuid,
        input: UpdateEmployeeInput,
    ) -> AppResult<EmployeeRecord> {
        let existing = self.get_employee(employee_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let daily_salary = input.daily_salary.unwrap_or(existing.daily_salary);

        if daily_salary < 0 {
            return Err(AppError::Validation {
                field: "daily_salary".to_string(),
                message: "Daily salary cannot be negative".to_string(),
            });
        }

        let employee = sqlx::query_as::<_, EmployeeRecord>(
            r#"
            UPDATE employees SET name = $1, daily_salary = $2 WHERE id = $3
            RETURNING id, name, daily_salary, current_balance
            "#,
        )
        .bind(name.trim())
        .bind(daily_salary)
        .bind(employee_id)
        .fetch_one(&self.db)
        .await?;

        Ok(employee)
    }

    /// Start a shift. An employee can hold only one open shift.
    pub async fn check_in(
        &self,
        employee_id: Uuid,
        store_id: Option<Uuid>,
    ) -> AppResult<AttendanceRecord> {
        self.get_employee(employee_id).await?;

        let open = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendance WHERE employee_id = $1 AND check_out IS NULL)",
        )
        .bind(employee_id)
        .fetch_one(&self.db)
        .await?;
        if open {
            return Err(AppError::Validation {
                field: "employee_id".to_string(),
                message: "Employee already has an open shift".to_string(),
            });
        }

        let attendance = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance (employee_id, store_id, check_in)
            VALUES ($1, $2, NOW())
            RETURNING id, employee_id, store_id, check_in, check_out, payroll_id
            "#,
        )
        .bind(employee_id)
        .bind(store_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(%employee_id, attendance_id = %attendance.id, "shift started");
        Ok(attendance)
    }

    /// End the open shift, pricing it and accruing the pay onto the
    /// employee's balance in the same transaction.
    pub async fn check_out(&self, employee_id: Uuid) -> AppResult<AttendanceView> {
        let employee = self.get_employee(employee_id).await?;

        let mut tx = self.db.begin().await?;

        let open = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT id, employee_id, store_id, check_in, check_out, payroll_id
             FROM attendance
             WHERE employee_id = $1 AND check_out IS NULL
             FOR UPDATE",
        )
        .bind(employee_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Open shift".to_string()))?;

        let closed = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            UPDATE attendance SET check_out = NOW() WHERE id = $1
            RETURNING id, employee_id, store_id, check_in, check_out, payroll_id
            "#,
        )
        .bind(open.id)
        .fetch_one(&mut *tx)
        .await?;

        let shift = closed.to_model();
        let earned = shift.salary_earned(employee.daily_salary);

        sqlx::query("UPDATE employees SET current_balance = current_balance + $1 WHERE id = $2")
            .bind(earned)
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%employee_id, earned, hours = shift.duration_in_hours(), "shift closed");
        Ok(AttendanceView {
            hours_worked: shift.duration_in_hours(),
            salary_earned: earned,
            attendance: closed,
        })
    }

    /// Timesheet for an employee, newest shift first. Open shifts
    /// report hours against the clock and no pay yet.
    pub async fn attendance_history(&self, employee_id: Uuid) -> AppResult<Vec<AttendanceView>> {
        let employee = self.get_employee(employee_id).await?;

        let rows = sqlx::query_as::<_, AttendanceRecord>(
            "SELECT id, employee_id, store_id, check_in, check_out, payroll_id
             FROM attendance WHERE employee_id = $1
             ORDER BY check_in DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.db)
        .await?;

        let now = Utc::now();
        let views = rows
            .into_iter()
            .map(|record| {
                let shift = record.to_model();
                AttendanceView {
                    hours_worked: shift.hours_worked(now),
                    salary_earned: shift.salary_earned(employee.daily_salary),
                    attendance: record,
                }
            })
            .collect();

        Ok(views)
    }

    /// Preview the next payroll: the period opens the day after the
    /// last settled period, or at the first shift if none exists, and
    /// closes today (Jakarta).
    pub async fn payroll_summary(&self, employee_id: Uuid) -> AppResult<PayrollSummary> {
        self.get_employee(employee_id).await?;

        let period_start = self.next_period_start(employee_id).await?;
        let period_end = local_date(Utc::now());

        let (shift_count, total_due) = self
            .settleable_shifts(employee_id, period_start, period_end)
            .await?;

        Ok(PayrollSummary {
            employee_id,
            period_start,
            period_end,
            shift_count,
            total_due,
        })
    }

    /// Cut a payroll: settle every completed, unlinked shift in the
    /// period and zero the employee's balance.
    pub async fn create_payroll(&self, employee_id: Uuid) -> AppResult<PayrollRecord> {
        let employee = self.get_employee(employee_id).await?;

        let period_start = self.next_period_start(employee_id).await?;
        let period_end = local_date(Utc::now());

        let mut tx = self.db.begin().await?;

        let shifts = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, store_id, check_in, check_out, payroll_id
            FROM attendance
            WHERE employee_id = $1 AND check_out IS NOT NULL AND payroll_id IS NULL
              AND ($2::date IS NULL OR (check_in + INTERVAL '7 hours')::date >= $2)
              AND (check_in + INTERVAL '7 hours')::date <= $3
            FOR UPDATE
            "#,
        )
        .bind(employee_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_all(&mut *tx)
        .await?;

        if shifts.is_empty() {
            return Err(AppError::Validation {
                field: "employee_id".to_string(),
                message: "No completed shifts to settle".to_string(),
            });
        }

        let total: i64 = shifts
            .iter()
            .map(|record| record.to_model().salary_earned(employee.daily_salary))
            .sum();

        let payroll = sqlx::query_as::<_, PayrollRecord>(
            r#"
            INSERT INTO payrolls (employee_id, period_start, period_end, total_paid, paid_at, is_paid)
            VALUES ($1, $2, $3, $4, NOW(), true)
            RETURNING id, employee_id, period_start, period_end, total_paid, paid_at, is_paid
            "#,
        )
        .bind(employee_id)
        .bind(period_start)
        .bind(period_end)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let ids: Vec<Uuid> = shifts.iter().map(|s| s.id).collect();
        sqlx::query("UPDATE attendance SET payroll_id = $1 WHERE id = ANY($2)")
            .bind(payroll.id)
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE employees SET current_balance = 0 WHERE id = $1")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%employee_id, payroll_id = %payroll.id, total, "payroll settled");
        Ok(payroll)
    }

    /// Settled payrolls for an employee, newest first
    pub async fn payroll_history(&self, employee_id: Uuid) -> AppResult<Vec<PayrollRecord>> {
        self.get_employee(employee_id).await?;

        let payrolls = sqlx::query_as::<_, PayrollRecord>(
            "SELECT id, employee_id, period_start, period_end, total_paid, paid_at, is_paid
             FROM payrolls WHERE employee_id = $1
             ORDER BY paid_at DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.db)
        .await?;

        Ok(payrolls)
    }

    /// Day after the last settled period, or None when nothing has
    /// been settled yet (the period is then open at the start).
    async fn next_period_start(&self, employee_id: Uuid) -> AppResult<Option<NaiveDate>> {
        let last_end = sqlx::query_scalar::<_, Option<NaiveDate>>(
            "SELECT MAX(period_end) FROM payrolls WHERE employee_id = $1",
        )
        .bind(employee_id)
        .fetch_one(&self.db)
        .await?;

        Ok(last_end.map(|end| end + Duration::days(1)))
    }

    async fn settleable_shifts(
        &self,
        employee_id: Uuid,
        period_start: Option<NaiveDate>,
        period_end: NaiveDate,
    ) -> AppResult<(i64, i64)> {
        let employee = self.get_employee(employee_id).await?;

        let shifts = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, store_id, check_in, check_out, payroll_id
            FROM attendance
            WHERE employee_id = $1 AND check_out IS NOT NULL AND payroll_id IS NULL
              AND ($2::date IS NULL OR (check_in + INTERVAL '7 hours')::date >= $2)
              AND (check_in + INTERVAL '7 hours')::date <= $3
            "#,
        )
        .bind(employee_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_all(&self.db)
        .await?;

        let total: i64 = shifts
            .iter()
            .map(|record| record.to_model().salary_earned(employee.daily_salary))
            .sum();

        Ok((shifts.len() as i64, total))
    }
}
