/// Weights of the HADDOCK water-refinement scoring function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub vdw: f64,
    pub elec: f64,
    pub desolv: f64,
    pub air: f64,
}

/// `1.0 Evdw + 0.2 Eelec + 1.0 Edesolv + 0.1 Eair`
pub const WATER: ScoreWeights = ScoreWeights {
    vdw: 1.0,
    elec: 0.2,
    desolv: 1.0,
    air: 0.1,
};

impl Default for ScoreWeights {
    fn default() -> Self {
        WATER
    }
}

impl ScoreWeights {
    pub fn score(&self, evdw: f64, eelec: f64, edesolv: f64, eair: f64) -> f64 {
        self.vdw * evdw + self.elec * eelec + self.desolv * edesolv + self.air * eair
    }
}

pub fn haddock_score(evdw: f64, eelec: f64, edesolv: f64, eair: f64) -> f64 {
    WATER.score(evdw, eelec, edesolv, eair)
}
