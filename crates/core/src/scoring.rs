use types::Weights;

use crate::catalog::Catalog;
use crate::schedule::Schedule;

/// Raw cost components of a schedule plus their weighted total.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scores {
    pub group_windows: f64,
    pub lecturer_windows: f64,
    pub time_earliness: f64,
    pub capacity_fill: f64,
    pub objective: f64,
}

impl Scores {
    pub fn fitness(&self) -> f64 {
        fitness(self.objective)
    }
}

/// Maps a total cost to `(0, 1]`; zero cost gives 1.
#[inline]
pub fn fitness(cost: f64) -> f64 {
    1.0 / (1.0 + cost)
}

pub fn compute_soft_scores(catalog: &Catalog, schedule: &Schedule, weights: &Weights) -> Scores {
    let scores = catalog.scores();

    let group_windows = schedule.group_window_cost(scores);
    let lecturer_windows = schedule.lecturer_window_cost(scores);
    let time_earliness = schedule.time_earliness_cost(scores);
    let capacity_fill = schedule.capacity_fill_cost(catalog);

    let objective = weights.group_windows * group_windows
        + weights.lecturer_windows * lecturer_windows
        + weights.time_earliness * time_earliness
        + weights.capacity_fill * capacity_fill;

    Scores {
        group_windows,
        lecturer_windows,
        time_earliness,
        capacity_fill,
        objective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::schedule::Assignment;

    #[test]
    fn fitness_is_bounded_and_decreasing() {
        assert_eq!(fitness(0.0), 1.0);
        assert!(fitness(1.0) < fitness(0.5));
        assert!(fitness(1e9) > 0.0);
    }

    #[test]
    fn weights_scale_each_component() {
        let cat = Catalog::new(&fixtures::instance()).unwrap();
        let s = Schedule::from_assignments(vec![
            Assignment {
                group: 0,
                subject: 0,
                lecturer: Some(0),
                classroom: Some(1),
                slot: Some(0),
            },
            Assignment {
                group: 0,
                subject: 1,
                lecturer: Some(1),
                classroom: Some(0),
                slot: Some(2),
            },
        ]);
        let s_default = compute_soft_scores(&cat, &s, &Weights::default());
        assert_eq!(s_default.group_windows, 2.0);
        assert_eq!(s_default.lecturer_windows, 0.0);
        assert_eq!(s_default.time_earliness, 2.0);
        let fill = 20.0 / 40.0 + 5.0 / 25.0;
        assert!((s_default.capacity_fill - fill).abs() < 1e-12);
        let expected = 2.0 + 0.0 + 0.5 * 2.0 + 0.5 * fill;
        assert!((s_default.objective - expected).abs() < 1e-12);
        assert!((s_default.fitness() - 1.0 / (1.0 + expected)).abs() < 1e-12);

        let only_windows = Weights {
            group_windows: 3.0,
            lecturer_windows: 0.0,
            time_earliness: 0.0,
            capacity_fill: 0.0,
        };
        assert_eq!(compute_soft_scores(&cat, &s, &only_windows).objective, 6.0);
    }
}
