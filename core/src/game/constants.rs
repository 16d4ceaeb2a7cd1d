pub(crate) const DEFAULT_TARIFF: f64 = 0.1;
pub(crate) const INITIAL_FOREIGN_RESERVES: f64 = 100.0;

pub(crate) const EXPORT_DEMAND_RANGE: (f64, f64) = (50.0, 100.0);
pub(crate) const IMPORT_RANGE: (f64, f64) = (30.0, 80.0);
pub(crate) const BASE_GROWTH_PCT_RANGE: (f64, f64) = (1.0, 3.0);

pub(crate) const EXPORT_VALUE_RATIO: f64 = 0.8;
pub(crate) const EXPORT_GDP_WEIGHT: f64 = 0.3;
pub(crate) const TARIFF_REVENUE_GDP_WEIGHT: f64 = 0.1;
pub(crate) const SURPLUS_GDP_WEIGHT: f64 = 0.05;
pub(crate) const DEFICIT_GDP_WEIGHT: f64 = 0.03;

pub(crate) const TARIFF_INFLATION_WEIGHT: f64 = 2.0;
pub(crate) const INFLATION_BASELINE_DRIFT: f64 = 0.5;

pub(crate) const UNEMPLOYMENT_STEP: f64 = 0.5;
pub(crate) const GROWTH_UNEMPLOYMENT_WEIGHT: f64 = 0.8;
pub(crate) const CONTRACTION_UNEMPLOYMENT_WEIGHT: f64 = 1.2;

pub(crate) const IMPORT_GROWTH_ELASTICITY: f64 = 0.7;
pub(crate) const IMPORT_INFLATION_DAMPING: f64 = 0.5;

pub(crate) const RETALIATION_TARIFF_THRESHOLD: f64 = 0.25;
pub(crate) const RETALIATION_TARIFF_FLOOR: f64 = 0.2;
pub(crate) const RETALIATION_SLOPE: f64 = 5.0;
pub(crate) const MAX_RETALIATION_CHANCE: f64 = 0.7;
pub(crate) const RETALIATION_DEMAND_FACTOR: f64 = 0.8;
