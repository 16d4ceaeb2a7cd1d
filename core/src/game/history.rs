use serde::Serialize;

/// Yearly indicator series. Index 0 holds the state before the first simulated year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorHistory {
    pub gdp: Vec<f64>,
    pub unemployment: Vec<f64>,
    pub inflation: Vec<f64>,
    pub trade_balance: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub year: u32,
    pub gdp: f64,
    pub unemployment: f64,
    pub inflation: f64,
    pub trade_balance: f64,
}

impl IndicatorHistory {
    pub(crate) fn starting_at(gdp: f64, unemployment: f64, inflation: f64) -> Self {
        let mut history = Self::default();
        history.record(gdp, unemployment, inflation, 0.0);
        history
    }

    pub(crate) fn record(&mut self, gdp: f64, unemployment: f64, inflation: f64, trade_balance: f64) {
        self.gdp.push(gdp);
        self.unemployment.push(unemployment);
        self.inflation.push(inflation);
        self.trade_balance.push(trade_balance);
    }

    pub fn len(&self) -> usize {
        self.gdp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gdp.is_empty()
    }

    pub fn first(&self) -> Option<HistoryPoint> {
        self.point(0)
    }

    pub fn latest(&self) -> Option<HistoryPoint> {
        self.len().checked_sub(1).and_then(|idx| self.point(idx))
    }

    pub fn point(&self, idx: usize) -> Option<HistoryPoint> {
        Some(HistoryPoint {
            year: idx as u32 + 1,
            gdp: *self.gdp.get(idx)?,
            unemployment: *self.unemployment.get(idx)?,
            inflation: *self.inflation.get(idx)?,
            trade_balance: *self.trade_balance.get(idx)?,
        })
    }

    pub fn points(&self) -> impl Iterator<Item = HistoryPoint> + '_ {
        (0..self.len()).filter_map(|idx| self.point(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_initial_point_and_zero_balance() {
        let history = IndicatorHistory::starting_at(1000.0, 5.0, 2.0);
        assert_eq!(history.len(), 1);
        let first = history.first().unwrap();
        assert_eq!(first.year, 1);
        assert_eq!(first.trade_balance, 0.0);
        assert_eq!(history.latest(), Some(first));
    }

    #[test]
    fn points_are_numbered_by_year() {
        let mut history = IndicatorHistory::starting_at(1000.0, 5.0, 2.0);
        history.record(1030.0, 4.6, 1.9, -12.5);
        let years: Vec<u32> = history.points().map(|point| point.year).collect();
        assert_eq!(years, vec![1, 2]);
        assert_eq!(history.latest().unwrap().trade_balance, -12.5);
        assert!(history.point(2).is_none());
    }
}
