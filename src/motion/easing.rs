use std::f64::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    SineInOut,
    Power2Out,
    Power3Out,
    ElasticOut { amplitude: f64, period: f64 },
}

impl Easing {
    pub const ELASTIC_RETURN: Easing = Easing::ElasticOut {
        amplitude: 1.0,
        period: 0.4,
    };

    /// Maps linear progress in `[0, 1]` to eased progress. The endpoints are
    /// exact for every curve so a finished tween lands on its target.
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Self::Linear => t,
            Self::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power3Out => 1.0 - (1.0 - t).powi(4),
            Self::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
        }
    }
}

fn elastic_out(t: f64, amplitude: f64, period: f64) -> f64 {
    let amplitude = amplitude.max(1.0);
    let period = if period > 0.0 { period } else { 0.3 };
    let shift = period / TAU * (1.0 / amplitude).asin();

    amplitude * 2f64.powf(-10.0 * t) * ((t - shift) * TAU / period).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::SineInOut,
        Easing::Power2Out,
        Easing::Power3Out,
        Easing::ELASTIC_RETURN,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.0), 1.0);
        }
    }

    #[test]
    fn sine_in_out_is_symmetric_about_midpoint() {
        let mid = Easing::SineInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 1e-12);

        let early = Easing::SineInOut.apply(0.25);
        let late = Easing::SineInOut.apply(0.75);
        assert!((early + late - 1.0).abs() < 1e-12);
    }

    #[test]
    fn power_curves_front_load_progress() {
        assert!(Easing::Power2Out.apply(0.25) > 0.25);
        assert!(Easing::Power3Out.apply(0.25) > Easing::Power2Out.apply(0.25));
    }

    #[test]
    fn elastic_out_overshoots_then_settles() {
        let samples: Vec<f64> = (1..100).map(|step| Easing::ELASTIC_RETURN.apply(step as f64 / 100.0)).collect();

        assert!(samples.iter().any(|value| *value > 1.0));
        let tail = samples[samples.len() - 1];
        assert!((tail - 1.0).abs() < 0.01);
    }
}
