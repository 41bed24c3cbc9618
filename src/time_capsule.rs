use crate::error::DiaryError;
use crate::photo::Photo;
use crate::text_input::TextInput;
use chrono::{DateTime, LocalResult, Months, NaiveDateTime, TimeDelta, TimeZone};
use tracing::info;
use uuid::Uuid;

const ONE_YEAR: Months = Months::new(12);

/// A message sealed until one year after it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeCapsule<Tz: TimeZone> {
    pub id: Uuid,
    pub created_at: DateTime<Tz>,
    pub unlock_at: DateTime<Tz>,
    pub message: String,
    pub photo: Option<Photo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapsuleState {
    Locked { remaining: TimeDelta },
    Unlocked,
}

/// Wall-clock time one calendar year after `created`, in the same zone.
///
/// Feb 29 maps to Feb 28 of the following year. If that local time falls in a
/// DST gap, the wall-clock distance is added as an absolute duration instead.
pub fn unlock_time<Tz: TimeZone>(created: &DateTime<Tz>) -> Result<DateTime<Tz>, DiaryError> {
    let local = created.naive_local();
    let target = local
        .checked_add_months(ONE_YEAR)
        .ok_or_else(|| DiaryError::DateOutOfRange(format!("{local} + 1 year")))?;
    let mapped = created.timezone().from_local_datetime(&target);
    resolve_unlock(created, target, mapped)
}

/// Earliest instant that reads as `target` on the wall clock, or, when `target`
/// does not exist in the zone, `created` moved by the same wall-clock distance.
fn resolve_unlock<Tz: TimeZone>(
    created: &DateTime<Tz>,
    target: NaiveDateTime,
    mapped: LocalResult<DateTime<Tz>>,
) -> Result<DateTime<Tz>, DiaryError> {
    if let Some(unlock) = mapped.earliest() {
        return Ok(unlock);
    }
    created
        .clone()
        .checked_add_signed(target - created.naive_local())
        .ok_or_else(|| DiaryError::DateOutOfRange(format!("{target}")))
}

impl<Tz: TimeZone> TimeCapsule<Tz> {
    pub fn state_at(&self, now: &DateTime<Tz>) -> CapsuleState {
        if *now >= self.unlock_at {
            CapsuleState::Unlocked
        } else {
            CapsuleState::Locked {
                remaining: self.unlock_at.clone() - now.clone(),
            }
        }
    }
}

/// The time-capsule form.
#[derive(Debug, Clone, Default)]
pub struct CapsuleDraft {
    pub message: TextInput,
    pub photo: Option<Photo>,
}

impl CapsuleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seal<Tz: TimeZone>(self, now: DateTime<Tz>) -> Result<TimeCapsule<Tz>, DiaryError> {
        let unlock_at = unlock_time(&now)?;
        Ok(TimeCapsule {
            id: Uuid::new_v4(),
            created_at: now,
            unlock_at,
            message: self.message.into_string(),
            photo: self.photo,
        })
    }
}

/// Every capsule sealed this session, in creation order.
#[derive(Debug, Clone)]
pub struct CapsuleVault<Tz: TimeZone> {
    capsules: Vec<TimeCapsule<Tz>>,
}

impl<Tz: TimeZone> Default for CapsuleVault<Tz> {
    fn default() -> Self {
        CapsuleVault {
            capsules: Vec::new(),
        }
    }
}

impl<Tz: TimeZone> CapsuleVault<Tz> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, capsule: TimeCapsule<Tz>) {
        info!(id = %capsule.id, unlock_at = ?capsule.unlock_at, "time capsule sealed");
        self.capsules.push(capsule);
    }

    pub fn len(&self) -> usize {
        self.capsules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capsules.is_empty()
    }

    pub fn states<'a>(
        &'a self,
        now: &'a DateTime<Tz>,
    ) -> impl Iterator<Item = (&'a TimeCapsule<Tz>, CapsuleState)> + 'a {
        self.capsules.iter().map(move |c| (c, c.state_at(now)))
    }
}

/// "in 3 months", "in 1 day", ... for a locked capsule.
pub fn describe_remaining(remaining: TimeDelta) -> String {
    let (amount, unit) = if remaining.num_days() >= 60 {
        (remaining.num_days() / 30, "month")
    } else if remaining.num_days() >= 1 {
        (remaining.num_days(), "day")
    } else if remaining.num_hours() >= 1 {
        (remaining.num_hours(), "hour")
    } else if remaining.num_minutes() >= 1 {
        (remaining.num_minutes(), "minute")
    } else {
        return "in a moment".to_string();
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("in {amount} {unit}{plural}")
}
