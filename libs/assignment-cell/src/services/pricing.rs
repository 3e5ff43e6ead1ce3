use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use tracing::debug;

use crate::error::AssignmentError;
use crate::models::ParkingOption;

const BASE_FARE: f64 = 159.0;
const BASE_MINUTES: i32 = 60;
const MAX_MINUTES: i32 = 120;
const BLOCK_MINUTES: i32 = 15;
const BLOCK_RATE: f64 = 35.0;
const WEEKEND_LOADING: f64 = 1.2;
const EVENING_LOADING: f64 = 1.2;
const LATE_NIGHT_LOADING: f64 = 1.3;
const PAID_PARKING_FEE: f64 = 20.0;

pub struct PricingService;

impl PricingService {
    pub fn new() -> Self {
        Self
    }

    /// Quote the total price for a visit. Computed once at booking creation
    /// and frozen on the booking.
    pub fn quote(
        &self,
        duration_minutes: i32,
        scheduled_at: NaiveDateTime,
        parking: ParkingOption,
    ) -> Result<f64, AssignmentError> {
        if !(BASE_MINUTES..=MAX_MINUTES).contains(&duration_minutes)
            || duration_minutes % BLOCK_MINUTES != 0
        {
            return Err(AssignmentError::ValidationError(format!(
                "Duration must be {}-{} minutes in {}-minute steps",
                BASE_MINUTES, MAX_MINUTES, BLOCK_MINUTES
            )));
        }

        let extra_blocks = (duration_minutes - BASE_MINUTES) / BLOCK_MINUTES;
        let mut price = BASE_FARE + f64::from(extra_blocks) * BLOCK_RATE;

        // Weekend and after-hours loadings stack, matching the fare card.
        if matches!(scheduled_at.weekday(), Weekday::Sat | Weekday::Sun) {
            price *= WEEKEND_LOADING;
        }

        let hour = scheduled_at.hour();
        if (16..21).contains(&hour) {
            price *= EVENING_LOADING;
        } else if hour >= 21 || hour < 9 {
            price *= LATE_NIGHT_LOADING;
        }

        if parking != ParkingOption::Free {
            price += PAID_PARKING_FEE;
        }

        let price = (price * 100.0).round() / 100.0;
        debug!(
            "Quoted ${:.2} for {} minutes at {}",
            price, duration_minutes, scheduled_at
        );
        Ok(price)
    }
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new()
    }
}
