use tradesim_core::EntitySnapshot;

pub const TERM_YEARS: u32 = 5;
pub const MAX_SCORE: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermEvaluation {
    pub gdp_growth_pct: f64,
    pub unemployment_change: f64,
    pub inflation_change: f64,
    pub score: u32,
}

impl TermEvaluation {
    /// Compares the final indicators against the first history entry.
    pub fn from_snapshot(snapshot: &EntitySnapshot) -> Self {
        let (initial_gdp, initial_unemployment, initial_inflation) = snapshot
            .history
            .first()
            .map(|point| (point.gdp, point.unemployment, point.inflation))
            .unwrap_or((snapshot.gdp, snapshot.unemployment, snapshot.inflation));

        let gdp_growth_pct = (snapshot.gdp - initial_gdp) / initial_gdp * 100.0;
        let unemployment_change = snapshot.unemployment - initial_unemployment;
        let inflation_change = snapshot.inflation - initial_inflation;
        let score = growth_points(gdp_growth_pct)
            + unemployment_points(unemployment_change)
            + inflation_points(inflation_change);

        Self {
            gdp_growth_pct,
            unemployment_change,
            inflation_change,
            score,
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self.score {
            8.. => "優秀！経済政策は顕著な成果を上げ、国は繁栄しています。",
            6..=7 => "良好！政策はおおむね有効で、経済は安定成長を保っています。",
            4..=5 => "普通。経済の成績は平凡で、改善の余地があります。",
            _ => "要改善。政策が経済問題を招きました。次はより賢明な選択を。",
        }
    }
}

fn growth_points(gdp_growth_pct: f64) -> u32 {
    if gdp_growth_pct > 15.0 {
        3
    } else if gdp_growth_pct > 10.0 {
        2
    } else if gdp_growth_pct > 5.0 {
        1
    } else {
        0
    }
}

fn unemployment_points(change: f64) -> u32 {
    if change < -2.0 {
        3
    } else if change < 0.0 {
        2
    } else if change < 2.0 {
        1
    } else {
        0
    }
}

fn inflation_points(change: f64) -> u32 {
    let drift = change.abs();
    if drift < 1.0 {
        3
    } else if drift < 2.0 {
        2
    } else if drift < 3.0 {
        1
    } else {
        0
    }
}
