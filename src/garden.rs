//! Points ledger, planting and watering.
//!
//! A plant climbs one stage each time its water count reaches the threshold
//! for the current stage. Each threshold is half again the previous one.
//! Reaching bloom issues a discount coupon exactly once. Every change to the
//! balance is kept as a transaction, and badges unlock as it grows.

use crate::error::{GardenError, Result};
use crate::plant::Stage;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Waters needed to leave the first stage
pub const INITIAL_WATER_THRESHOLD: u32 = 3;
pub const DISCOUNT_OPTIONS: [u32; 5] = [5, 10, 15, 20, 25];

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SEED_LEN: usize = 6;

/// Reward handed out when a plant blooms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub percent_off: u32,
}

impl Coupon {
    fn issue<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let percent_off = DISCOUNT_OPTIONS[rng.gen_range(0..DISCOUNT_OPTIONS.len())];
        let tag = random_base36(rng, 4).to_uppercase();
        Self {
            code: format!("BLOOM-{}-{}", tag, percent_off),
            percent_off,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: u32,
    pub name: String,
    pub seed: String,
    pub stage: Stage,
    pub water_count: u32,
    pub max_water_for_stage: u32,
    pub planted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
}

/// Result of one watering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaterOutcome {
    /// Water counted, no stage change
    Watered { water_count: u32, needed: u32 },
    /// Stage advanced below bloom
    Grew { stage: Stage },
    /// Reached bloom and earned a coupon
    Bloomed { coupon: Coupon },
    /// Already at bloom, nothing changed
    AlreadyBloomed,
}

impl Plant {
    pub fn new(id: u32, name: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            seed: seed.into(),
            stage: Stage::Seedling,
            water_count: 0,
            max_water_for_stage: INITIAL_WATER_THRESHOLD,
            planted_at: Utc::now(),
            coupon: None,
        }
    }

    /// Plant with a fresh random seed
    pub fn sow<R: Rng + ?Sized>(id: u32, name: impl Into<String>, rng: &mut R) -> Self {
        Self::new(id, name, random_seed(rng))
    }

    pub fn water<R: Rng + ?Sized>(&mut self, rng: &mut R) -> WaterOutcome {
        let Some(next) = self.stage.next() else {
            return WaterOutcome::AlreadyBloomed;
        };

        self.water_count += 1;
        if self.water_count < self.max_water_for_stage {
            return WaterOutcome::Watered {
                water_count: self.water_count,
                needed: self.max_water_for_stage,
            };
        }

        self.stage = next;
        self.water_count = 0;
        self.max_water_for_stage = (self.max_water_for_stage as f64 * 1.5).floor() as u32;

        if next.is_bloom() {
            let coupon = Coupon::issue(rng);
            self.coupon = Some(coupon.clone());
            WaterOutcome::Bloomed { coupon }
        } else {
            WaterOutcome::Grew { stage: next }
        }
    }

    /// Progress through the current stage as a fraction
    pub fn progress(&self) -> f64 {
        if self.stage.is_bloom() || self.max_water_for_stage == 0 {
            return 1.0;
        }
        self.water_count as f64 / self.max_water_for_stage as f64
    }
}

/// Costs charged by the garden, usually taken from settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Costs {
    pub water: u32,
    pub plant: u32,
}

impl Default for Costs {
    fn default() -> Self {
        Self { water: 10, plant: 50 }
    }
}

/// Milestones unlocked once the balance reaches their threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    Seedling,
    Sapling,
    #[serde(rename = "Growing Tree")]
    GrowingTree,
    #[serde(rename = "Ancient Banyan")]
    AncientBanyan,
}

impl Badge {
    pub const ALL: [Badge; 4] = [
        Badge::Seedling,
        Badge::Sapling,
        Badge::GrowingTree,
        Badge::AncientBanyan,
    ];

    pub fn threshold(self) -> u32 {
        match self {
            Badge::Seedling => 100,
            Badge::Sapling => 300,
            Badge::GrowingTree => 600,
            Badge::AncientBanyan => 1000,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Badge::Seedling => "Seedling",
            Badge::Sapling => "Sapling",
            Badge::GrowingTree => "Growing Tree",
            Badge::AncientBanyan => "Ancient Banyan",
        };
        f.write_str(name)
    }
}

/// One change to the points balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: i64,
    pub reason: String,
    pub at: DateTime<Utc>,
}

/// A user's points and plants
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Garden {
    pub points: u32,
    #[serde(default)]
    pub next_id: u32,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default, rename = "transaction")]
    pub transactions: Vec<Transaction>,
    #[serde(default, rename = "plant")]
    pub plants: Vec<Plant>,
}

impl Garden {
    pub fn with_points(points: u32) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Credit points and return any badges unlocked by the new balance
    pub fn earn(&mut self, points: u32, reason: &str) -> Vec<Badge> {
        self.points = self.points.saturating_add(points);
        self.record(points as i64, reason);
        tracing::info!(points, reason, balance = self.points, "points earned");
        self.unlock_badges()
    }

    /// Spend points on a reward, returning the remaining balance
    pub fn redeem(&mut self, cost: u32, reward: &str) -> Result<u32> {
        let reward = reward.trim();
        if reward.is_empty() {
            return Err(GardenError::InvalidArgument("reward name is empty".to_string()));
        }
        self.spend(cost, &format!("Redeemed {}", reward))?;
        tracing::info!(cost, reward, balance = self.points, "reward redeemed");
        Ok(self.points)
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }

    fn unlock_badges(&mut self) -> Vec<Badge> {
        let mut unlocked = Vec::new();
        for badge in Badge::ALL {
            if self.points >= badge.threshold() && !self.has_badge(badge) {
                tracing::info!(%badge, "badge unlocked");
                self.badges.push(badge);
                unlocked.push(badge);
            }
        }
        unlocked
    }

    fn record(&mut self, amount: i64, reason: &str) {
        self.transactions.push(Transaction {
            amount,
            reason: reason.to_string(),
            at: Utc::now(),
        });
    }

    fn spend(&mut self, cost: u32, reason: &str) -> Result<()> {
        if self.points < cost {
            return Err(GardenError::InsufficientPoints {
                needed: cost,
                available: self.points,
            });
        }
        self.points -= cost;
        self.record(-(cost as i64), reason);
        Ok(())
    }

    /// Keep `next_id` past every existing plant id. Files written by hand or
    /// by older versions may lack it.
    pub fn sync_next_id(&mut self) {
        let highest = self.plants.iter().map(|p| p.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(highest);
    }

    /// Plant a new seed. The first plant is free.
    pub fn plant<R: Rng + ?Sized>(&mut self, name: &str, costs: Costs, rng: &mut R) -> Result<&Plant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GardenError::InvalidArgument("plant name is empty".to_string()));
        }
        if !self.plants.is_empty() {
            self.spend(costs.plant, "Planting Seed")?;
        }

        self.sync_next_id();
        self.next_id += 1;
        let plant = Plant::sow(self.next_id, name, rng);
        tracing::info!(id = plant.id, name = %plant.name, seed = %plant.seed, "seed planted");
        self.plants.push(plant);
        Ok(&self.plants[self.plants.len() - 1])
    }

    /// Water a plant, paying the water cost unless it has already bloomed
    pub fn water<R: Rng + ?Sized>(&mut self, key: &str, costs: Costs, rng: &mut R) -> Result<WaterOutcome> {
        let idx = self.position(key)?;
        if self.plants[idx].stage.is_bloom() {
            return Ok(WaterOutcome::AlreadyBloomed);
        }
        self.spend(costs.water, "Watering Plant")?;

        let plant = &mut self.plants[idx];
        let outcome = plant.water(rng);
        match &outcome {
            WaterOutcome::Grew { stage } => {
                tracing::info!(id = plant.id, stage = stage.number(), "plant grew")
            }
            WaterOutcome::Bloomed { coupon } => {
                tracing::info!(id = plant.id, coupon = %coupon.code, "plant bloomed")
            }
            _ => tracing::debug!(id = plant.id, water = plant.water_count, "plant watered"),
        }
        Ok(outcome)
    }

    /// Find a plant by numeric id, then by exact name
    pub fn find(&self, key: &str) -> Result<&Plant> {
        self.position(key).map(|i| &self.plants[i])
    }

    fn position(&self, key: &str) -> Result<usize> {
        let by_id = key
            .parse::<u32>()
            .ok()
            .and_then(|id| self.plants.iter().position(|p| p.id == id));
        by_id
            .or_else(|| self.plants.iter().position(|p| p.name == key))
            .ok_or_else(|| GardenError::PlantNotFound(key.to_string()))
    }
}

/// Six lowercase base-36 characters
pub fn random_seed<R: Rng + ?Sized>(rng: &mut R) -> String {
    random_base36(rng, SEED_LEN)
}

fn random_base36<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn thresholds_grow_by_half() {
        let mut plant = Plant::new(1, "fern", "abc");
        let mut rng = rng();
        let mut thresholds = vec![plant.max_water_for_stage];
        while !plant.stage.is_bloom() {
            let before = plant.stage;
            plant.water(&mut rng);
            if plant.stage != before {
                thresholds.push(plant.max_water_for_stage);
            }
        }
        assert_eq!(thresholds, vec![3, 4, 6, 9, 13]);
    }

    #[test]
    fn full_growth_takes_22_waters() {
        let mut plant = Plant::new(1, "fern", "abc");
        let mut rng = rng();
        let mut waters = 0;
        while !plant.stage.is_bloom() {
            plant.water(&mut rng);
            waters += 1;
        }
        assert_eq!(waters, 3 + 4 + 6 + 9);
    }

    #[test]
    fn coupon_only_on_bloom() {
        let mut plant = Plant::new(1, "rose", "xyz");
        let mut rng = rng();
        let mut outcomes = Vec::new();
        while !plant.stage.is_bloom() {
            outcomes.push(plant.water(&mut rng));
        }
        let blooms: Vec<_> = outcomes
            .iter()
            .filter(|o| matches!(o, WaterOutcome::Bloomed { .. }))
            .collect();
        assert_eq!(blooms.len(), 1);
        assert!(matches!(outcomes.last(), Some(WaterOutcome::Bloomed { .. })));

        let coupon = plant.coupon.clone().unwrap();
        assert!(DISCOUNT_OPTIONS.contains(&coupon.percent_off));
        let parts: Vec<&str> = coupon.code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "BLOOM");
        assert_eq!(parts[1].len(), 4);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_eq!(parts[2], coupon.percent_off.to_string());
    }

    #[test]
    fn watering_bloomed_plant_is_noop() {
        let mut plant = Plant::new(1, "rose", "xyz");
        plant.stage = Stage::Bloom;
        let snapshot = plant.clone();
        assert_eq!(plant.water(&mut rng()), WaterOutcome::AlreadyBloomed);
        assert_eq!(plant, snapshot);
        assert_eq!(plant.progress(), 1.0);
    }

    #[test]
    fn first_plant_free_then_costs() {
        let mut garden = Garden::with_points(60);
        let mut rng = rng();
        garden.plant("one", Costs::default(), &mut rng).unwrap();
        assert_eq!(garden.points, 60);
        garden.plant("two", Costs::default(), &mut rng).unwrap();
        assert_eq!(garden.points, 10);

        let err = garden.plant("three", Costs::default(), &mut rng).unwrap_err();
        assert!(matches!(err, GardenError::InsufficientPoints { needed: 50, available: 10 }));
        assert_eq!(garden.plants.len(), 2);
        assert_eq!(garden.plants[1].id, 2);
    }

    #[test]
    fn sown_seed_is_base36() {
        let plant = Plant::sow(1, "x", &mut rng());
        assert_eq!(plant.seed.len(), 6);
        assert!(plant.seed.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn empty_name_rejected() {
        let mut garden = Garden::with_points(0);
        assert!(matches!(
            garden.plant("  ", Costs::default(), &mut rng()),
            Err(GardenError::InvalidArgument(_))
        ));
    }

    #[test]
    fn watering_charges_points() {
        let mut garden = Garden::with_points(25);
        let mut rng = rng();
        garden.plant("fern", Costs::default(), &mut rng).unwrap();

        let outcome = garden.water("fern", Costs::default(), &mut rng).unwrap();
        assert_eq!(outcome, WaterOutcome::Watered { water_count: 1, needed: 3 });
        assert_eq!(garden.points, 15);

        garden.water("1", Costs::default(), &mut rng).unwrap();
        assert_eq!(garden.points, 5);

        let err = garden.water("fern", Costs::default(), &mut rng).unwrap_err();
        assert!(matches!(err, GardenError::InsufficientPoints { .. }));
        assert_eq!(garden.plants[0].water_count, 2);
    }

    #[test]
    fn third_water_grows_to_sprout() {
        let mut garden = Garden::with_points(100);
        let mut rng = rng();
        garden.plant("fern", Costs::default(), &mut rng).unwrap();
        garden.water("fern", Costs::default(), &mut rng).unwrap();
        garden.water("fern", Costs::default(), &mut rng).unwrap();
        let outcome = garden.water("fern", Costs::default(), &mut rng).unwrap();
        assert_eq!(outcome, WaterOutcome::Grew { stage: Stage::Sprout });
        assert_eq!(garden.plants[0].water_count, 0);
        assert_eq!(garden.plants[0].max_water_for_stage, 4);
    }

    #[test]
    fn bloomed_plant_costs_nothing() {
        let mut garden = Garden::with_points(0);
        let mut rng = rng();
        garden.plant("rose", Costs::default(), &mut rng).unwrap();
        garden.plants[0].stage = Stage::Bloom;
        let outcome = garden.water("rose", Costs::default(), &mut rng).unwrap();
        assert_eq!(outcome, WaterOutcome::AlreadyBloomed);
        assert_eq!(garden.points, 0);
    }

    #[test]
    fn unknown_plant() {
        let garden = Garden::with_points(0);
        assert!(matches!(garden.find("ghost"), Err(GardenError::PlantNotFound(_))));
    }

    #[test]
    fn earn_saturates() {
        let mut garden = Garden::with_points(u32::MAX - 1);
        garden.earn(10, "quiz");
        assert_eq!(garden.points, u32::MAX);
    }

    #[test]
    fn badges_unlock_once() {
        let mut garden = Garden::with_points(0);
        assert!(garden.earn(99, "routine").is_empty());
        assert_eq!(garden.earn(1, "routine"), vec![Badge::Seedling]);
        assert!(garden.earn(50, "quiz").is_empty());

        // Spending below a threshold does not relock or re-award
        garden.redeem(100, "Face Wash").unwrap();
        assert!(garden.earn(60, "feedback").is_empty());
        assert_eq!(garden.badges, vec![Badge::Seedling]);
    }

    #[test]
    fn big_earn_unlocks_several_badges_in_order() {
        let mut garden = Garden::with_points(0);
        let unlocked = garden.earn(650, "referral");
        assert_eq!(unlocked, vec![Badge::Seedling, Badge::Sapling, Badge::GrowingTree]);
        assert!(!garden.has_badge(Badge::AncientBanyan));
        assert_eq!(garden.earn(350, "streak"), vec![Badge::AncientBanyan]);
    }

    #[test]
    fn redeem_checks_balance() {
        let mut garden = Garden::with_points(120);
        assert_eq!(garden.redeem(100, "Serum").unwrap(), 20);
        let err = garden.redeem(50, "Serum").unwrap_err();
        assert!(matches!(err, GardenError::InsufficientPoints { needed: 50, available: 20 }));
        assert_eq!(garden.points, 20);
        assert!(matches!(garden.redeem(1, " "), Err(GardenError::InvalidArgument(_))));
    }

    #[test]
    fn transactions_keep_reasons() {
        let mut garden = Garden::with_points(100);
        let mut rng = rng();
        garden.earn(25, "Daily Routine");
        garden.plant("fern", Costs::default(), &mut rng).unwrap();
        garden.water("fern", Costs::default(), &mut rng).unwrap();
        garden.redeem(40, "Sunscreen").unwrap();

        let ledger: Vec<(i64, &str)> = garden
            .transactions
            .iter()
            .map(|t| (t.amount, t.reason.as_str()))
            .collect();
        assert_eq!(
            ledger,
            vec![(25, "Daily Routine"), (-10, "Watering Plant"), (-40, "Redeemed Sunscreen")]
        );
        assert_eq!(garden.points, 75);
    }

    #[test]
    fn failed_spend_leaves_no_transaction() {
        let mut garden = Garden::with_points(5);
        assert!(garden.redeem(10, "Toner").is_err());
        assert!(garden.transactions.is_empty());
    }

    #[test]
    fn id_lookup_wins_over_numeric_name() {
        let mut garden = Garden::with_points(500);
        let mut rng = rng();
        garden.plant("2", Costs::default(), &mut rng).unwrap();
        garden.plant("rose", Costs::default(), &mut rng).unwrap();
        assert_eq!(garden.find("2").unwrap().name, "rose");
        assert_eq!(garden.find("1").unwrap().name, "2");

        garden.water("2", Costs::default(), &mut rng).unwrap();
        assert_eq!(garden.plants[1].water_count, 1);
        assert_eq!(garden.plants[0].water_count, 0);
    }

    #[test]
    fn name_lookup_used_when_no_id_matches() {
        let mut garden = Garden::with_points(0);
        garden.plant("42", Costs::default(), &mut rng()).unwrap();
        assert_eq!(garden.find("42").unwrap().id, 1);
    }

    #[test]
    fn missing_next_id_does_not_reuse_ids() {
        let mut garden = Garden::with_points(500);
        garden.plants.push(Plant::new(1, "fern", "abc"));
        garden.plants.push(Plant::new(2, "rose", "xyz"));
        assert_eq!(garden.next_id, 0);

        let id = garden.plant("ivy", Costs::default(), &mut rng()).unwrap().id;
        assert_eq!(id, 3);
    }

    #[test]
    fn badge_display_names() {
        assert_eq!(Badge::GrowingTree.to_string(), "Growing Tree");
        assert_eq!(Badge::AncientBanyan.threshold(), 1000);
    }
}
