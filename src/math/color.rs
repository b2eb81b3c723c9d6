use cgmath::BaseFloat;

/// A RGBA `Color`. Each color component is a floating point value
/// with a range from 0 to 1.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color<S> {
    pub r: S,
    pub g: S,
    pub b: S,
    pub a: S,
}

impl<S: BaseFloat> Into<[S; 4]> for Color<S> {
    fn into(self) -> [S; 4] {
        self.rgba()
    }
}

impl<S: BaseFloat> Color<S> {
    pub fn new(r: S, g: S, b: S, a: S) -> Self {
        Color { r, g, b, a }
    }

    pub fn rgba(&self) -> [S; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl<S: BaseFloat> Color<S> {
    pub fn black() -> Self {
        Color::new(S::zero(), S::zero(), S::zero(), S::one())
    }

    pub fn red() -> Self {
        Color::new(S::one(), S::zero(), S::zero(), S::one())
    }

    pub fn blue() -> Self {
        Color::new(S::zero(), S::zero(), S::one(), S::one())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn into_array() {
        let v: [f32; 4] = Color::<f32>::black().into();
        assert_eq!(v, [0.0, 0.0, 0.0, 1.0]);

        let v: [f32; 4] = Color::new(0.2f32, 0.3, 0.3, 1.0).into();
        assert_eq!(v, [0.2, 0.3, 0.3, 1.0]);
    }
}
