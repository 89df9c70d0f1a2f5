//! Transports, blood orders, and the dealing of blood bags to orders.

use rand::Rng;
use rand::seq::SliceRandom;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use blood_bank::OrderState;

/// Generated transport ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedTransport {
    pub id: Uuid,
    pub driver_id: Uuid,
}

/// Generated blood order ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedOrder {
    pub id: Uuid,
    pub date: OffsetDateTime,
    pub state: OrderState,
    pub is_urgent: bool,
    pub transport_id: Option<Uuid>,
    pub hospital_id: Uuid,
}

/// Blood-bag-to-order fulfillment row.
#[derive(Debug, Clone)]
pub struct GeneratedBloodBagOrder {
    pub blood_bag_id: Uuid,
    pub order_id: Uuid,
}

/// Configuration for order generation.
#[derive(Debug, Clone)]
pub struct OrderGenConfig {
    /// How far back order dates may reach, in days.
    pub lookback_days: i64,
    /// Probability that an order is marked urgent.
    pub urgent_probability: f64,
}

impl Default for OrderGenConfig {
    fn default() -> Self {
        Self {
            lookback_days: 3000,
            urgent_probability: 0.5,
        }
    }
}

/// Generates transports, one per sampled driver.
pub fn generate_transports(
    driver_ids: &[Uuid],
    count: usize,
    rng: &mut impl Rng,
) -> Vec<GeneratedTransport> {
    if driver_ids.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| GeneratedTransport {
            id: Uuid::new_v4(),
            driver_id: *driver_ids.choose(rng).unwrap(),
        })
        .collect()
}

/// Generates blood orders referencing hospitals and transports.
pub struct OrderGenerator {
    config: OrderGenConfig,
}

impl OrderGenerator {
    pub fn new() -> Self {
        Self::with_config(OrderGenConfig::default())
    }

    pub fn with_config(config: OrderGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single order. The transport reference is absent when no
    /// transports exist.
    pub fn generate(
        &self,
        hospital_ids: &[Uuid],
        transport_ids: &[Uuid],
        rng: &mut impl Rng,
    ) -> GeneratedOrder {
        let date = OffsetDateTime::now_utc()
            - Duration::days(rng.gen_range(1..=self.config.lookback_days));

        GeneratedOrder {
            id: Uuid::new_v4(),
            date,
            state: *OrderState::ALL.choose(rng).unwrap(),
            is_urgent: rng.r#gen::<f64>() < self.config.urgent_probability,
            transport_id: transport_ids.choose(rng).copied(),
            hospital_id: *hospital_ids.choose(rng).expect("orders require hospitals"),
        }
    }

    /// Generates multiple orders.
    pub fn generate_batch(
        &self,
        hospital_ids: &[Uuid],
        transport_ids: &[Uuid],
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedOrder> {
        (0..count)
            .map(|_| self.generate(hospital_ids, transport_ids, rng))
            .collect()
    }
}

impl Default for OrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Deals qualified blood bags to orders that still accept them.
///
/// Each COMPLETED or AWAITING order takes 1-3 bags from the supply, in
/// order, until the supply runs out. Canceled orders get nothing.
pub fn deal_bags_to_orders(
    orders: &[GeneratedOrder],
    available_bag_ids: &[Uuid],
    rng: &mut impl Rng,
) -> Vec<GeneratedBloodBagOrder> {
    let mut assignments = Vec::new();
    let mut supply = available_bag_ids.iter();

    for order in orders.iter().filter(|o| o.state.accepts_blood_bags()) {
        let wanted = rng.gen_range(1..=3usize);
        for _ in 0..wanted {
            let Some(&blood_bag_id) = supply.next() else {
                return assignments;
            };
            assignments.push(GeneratedBloodBagOrder {
                blood_bag_id,
                order_id: order.id,
            });
        }
    }
    assignments
}
