//! Portfolio health: how fresh each company's founder-reported metrics are
//!
//! A company needs an update once its last submission is older than
//! `needs_update_after_days`; a reminder is due when it needs an update and
//! has not been reminded within `renotify_after_days`. Sending the reminder
//! is left to the host application.

use crate::config::{HealthConfig, DEFAULT_NEEDS_UPDATE_DAYS, DEFAULT_RENOTIFY_DAYS};
use crate::error::{AppError, Result};
use crate::models::Company;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Freshness of a company's metric updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HealthStatus {
    /// Updated within the threshold
    Current,
    /// Last update is older than the threshold
    NeedsUpdate,
    /// Never submitted an update
    NeverReported,
}

impl HealthStatus {
    pub fn is_stale(&self) -> bool {
        !matches!(self, HealthStatus::Current)
    }
}

/// Aggregate health of the portfolio at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioHealth {
    pub total: usize,
    pub current: usize,
    pub needs_update: usize,
    pub never_reported: usize,
    /// Ids of companies a reminder should go to, in input order
    pub due_reminders: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// Evaluates companies against the configured thresholds
#[derive(Debug, Clone)]
pub struct HealthChecker {
    needs_update_after: Duration,
    renotify_after: Duration,
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self {
            needs_update_after: Duration::days(DEFAULT_NEEDS_UPDATE_DAYS),
            renotify_after: Duration::days(DEFAULT_RENOTIFY_DAYS),
        }
    }
}

fn threshold(days: i64, name: &str) -> Result<Duration> {
    match Duration::try_days(days) {
        Some(duration) if days > 0 => Ok(duration),
        _ => Err(AppError::Configuration(format!(
            "health.{} must be a positive, representable day count (got {})",
            name, days
        ))),
    }
}

impl HealthChecker {
    pub fn new(config: &HealthConfig) -> Result<Self> {
        Ok(Self {
            needs_update_after: threshold(config.needs_update_after_days, "needs_update_after_days")?,
            renotify_after: threshold(config.renotify_after_days, "renotify_after_days")?,
        })
    }

    /// Status of one company at `now`
    pub fn status(&self, company: &Company, now: DateTime<Utc>) -> HealthStatus {
        match company.last_update_at {
            None => HealthStatus::NeverReported,
            Some(at) if now - at > self.needs_update_after => HealthStatus::NeedsUpdate,
            Some(_) => HealthStatus::Current,
        }
    }

    /// True when the company is stale and was not reminded recently
    pub fn should_notify(&self, company: &Company, now: DateTime<Utc>) -> bool {
        if !self.status(company, now).is_stale() {
            return false;
        }

        match company.last_reminder_at {
            Some(at) => now - at >= self.renotify_after,
            None => true,
        }
    }

    /// Summarize every company
    pub fn summarize(&self, companies: &[Company], now: DateTime<Utc>) -> PortfolioHealth {
        let mut health = PortfolioHealth {
            total: companies.len(),
            current: 0,
            needs_update: 0,
            never_reported: 0,
            due_reminders: Vec::new(),
            evaluated_at: now,
        };

        for company in companies {
            match self.status(company, now) {
                HealthStatus::Current => health.current += 1,
                HealthStatus::NeedsUpdate => health.needs_update += 1,
                HealthStatus::NeverReported => health.never_reported += 1,
            }
            if self.should_notify(company, now) {
                health.due_reminders.push(company.id.clone());
            }
        }

        tracing::debug!(
            total = health.total,
            stale = health.needs_update + health.never_reported,
            reminders = health.due_reminders.len(),
            "Portfolio health evaluated"
        );

        health
    }
}
