#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    RotateX,
    RotateY,
    Rotate,
    Scale,
    ScaleX,
    X,
    Y,
    Z,
    Opacity,
}

impl Property {
    pub const ALL: [Property; 9] = [
        Self::RotateX,
        Self::RotateY,
        Self::Rotate,
        Self::Scale,
        Self::ScaleX,
        Self::X,
        Self::Y,
        Self::Z,
        Self::Opacity,
    ];
}

/// Visual state of one animated element. Rotations are in degrees,
/// translations in CSS pixels. `scale_x` stretches horizontally on top of
/// the uniform `scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub rotate: f64,
    pub scale: f64,
    pub scale_x: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub opacity: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl Pose {
    pub const NEUTRAL: Pose = Pose {
        rotate_x: 0.0,
        rotate_y: 0.0,
        rotate: 0.0,
        scale: 1.0,
        scale_x: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
        opacity: 1.0,
    };

    pub fn get(&self, property: Property) -> f64 {
        match property {
            Property::RotateX => self.rotate_x,
            Property::RotateY => self.rotate_y,
            Property::Rotate => self.rotate,
            Property::Scale => self.scale,
            Property::ScaleX => self.scale_x,
            Property::X => self.x,
            Property::Y => self.y,
            Property::Z => self.z,
            Property::Opacity => self.opacity,
        }
    }

    pub fn set(&mut self, property: Property, value: f64) {
        match property {
            Property::RotateX => self.rotate_x = value,
            Property::RotateY => self.rotate_y = value,
            Property::Rotate => self.rotate = value,
            Property::Scale => self.scale = value,
            Property::ScaleX => self.scale_x = value,
            Property::X => self.x = value,
            Property::Y => self.y = value,
            Property::Z => self.z = value,
            Property::Opacity => self.opacity = value,
        }
    }

    pub fn lerp(&self, to: &Pose, t: f64) -> Pose {
        let mut out = *self;
        for property in Property::ALL {
            let start = self.get(property);
            out.set(property, start + (to.get(property) - start) * t);
        }
        out
    }

    pub fn approx_eq(&self, other: &Pose, epsilon: f64) -> bool {
        Property::ALL
            .iter()
            .all(|property| (self.get(*property) - other.get(*property)).abs() <= epsilon)
    }

    pub fn is_neutral(&self, epsilon: f64) -> bool {
        self.approx_eq(&Self::NEUTRAL, epsilon)
    }

    pub fn css_transform(&self, perspective: Option<f64>) -> String {
        let mut out = String::new();
        if let Some(perspective) = perspective {
            out.push_str(&format!("perspective({perspective:.0}px) "));
        }
        out.push_str(&format!(
            "translate3d({:.3}px, {:.3}px, {:.3}px) rotateX({:.3}deg) rotateY({:.3}deg) rotate({:.3}deg) scale({:.4})",
            self.x, self.y, self.z, self.rotate_x, self.rotate_y, self.rotate, self.scale
        ));
        if self.scale_x != 1.0 {
            out.push_str(&format!(" scaleX({:.4})", self.scale_x));
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    To(f64),
    By(f64),
}

/// A partial pose: only the listed properties move, the rest keep their
/// current value. Later entries for the same property win.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseTarget {
    entries: Vec<(Property, Target)>,
}

impl PoseTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn neutral() -> Self {
        Property::ALL
            .iter()
            .fold(Self::new(), |target, property| target.to(*property, Pose::NEUTRAL.get(*property)))
    }

    pub fn to(mut self, property: Property, value: f64) -> Self {
        self.entries.push((property, Target::To(value)));
        self
    }

    pub fn by(mut self, property: Property, delta: f64) -> Self {
        self.entries.push((property, Target::By(delta)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, from: &Pose) -> Pose {
        let mut out = *from;
        for (property, target) in &self.entries {
            let value = match target {
                Target::To(value) => *value,
                Target::By(delta) => from.get(*property) + delta,
            };
            out.set(*property, value);
        }
        out
    }
}
