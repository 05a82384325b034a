use crate::{gfx::LightUniforms, math::Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct Spotlight {
    /// As set by the user, not necessarily unit length.
    direction: Vector3,
    cos_cutoff: f32,
    exponent: f32,
}

impl Default for Spotlight {
    fn default() -> Spotlight {
        Spotlight {
            direction: Vector3::down(),
            cos_cutoff: 30f32.to_radians().cos(),
            exponent: 10.0,
        }
    }
}

impl Spotlight {
    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    #[inline]
    pub fn set_direction(&mut self, direction: Vector3) {
        self.direction = direction;
    }

    #[inline]
    pub fn cos_cutoff(&self) -> f32 {
        self.cos_cutoff
    }

    /// Half-angle of the cone in degrees.
    #[inline]
    pub fn set_cutoff(&mut self, degrees: f32) {
        self.cos_cutoff = degrees.to_radians().cos();
    }

    #[inline]
    pub fn exponent(&self) -> f32 {
        self.exponent
    }

    #[inline]
    pub fn set_exponent(&mut self, exponent: f32) {
        self.exponent = exponent;
    }
}

/// The single point light (with an optional spot cone) lighting the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub position: Vector3,
    /// Per channel, usually `0..1`.
    pub color: Vector3,
    pub spotlight: Spotlight,
}

impl Default for Lighting {
    fn default() -> Lighting {
        Lighting {
            position: Vector3::new(0.0, 1.0, 1.1),
            color: Vector3::splat(1.0),
            spotlight: Spotlight::default(),
        }
    }
}

impl Lighting {
    /// Resolve into shader inputs. A zero spot direction points straight down.
    pub fn to_uniforms(
        &self,
        camera_position: Vector3,
        light_on: bool,
        spotlight_on: bool,
    ) -> LightUniforms {
        LightUniforms {
            position: self.position,
            color: self.color,
            camera_position,
            light_on,
            spot_direction: self.spotlight.direction.normalized(),
            spot_cos_cutoff: self.spotlight.cos_cutoff,
            spot_exponent: self.spotlight.exponent,
            spotlight_on,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn uniforms_normalize_direction() {
        let mut lighting = Lighting::default();
        lighting.spotlight.set_direction(Vector3::new(3.0, 0.0, 4.0));
        let uniforms = lighting.to_uniforms(Vector3::splat(0.0), true, true);
        assert_eq!(Vector3::new(0.6, 0.0, 0.8), uniforms.spot_direction);

        lighting.spotlight.set_direction(Vector3::splat(0.0));
        let uniforms = lighting.to_uniforms(Vector3::splat(0.0), true, true);
        assert_eq!(Vector3::down(), uniforms.spot_direction);
        assert!(uniforms.spot_direction.0.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn cutoff_in_degrees() {
        let mut spotlight = Spotlight::default();
        assert!((spotlight.cos_cutoff() - 0.866_025_4).abs() < 1e-6);
        spotlight.set_cutoff(60.0);
        assert!((spotlight.cos_cutoff() - 0.5).abs() < 1e-6);
        spotlight.set_cutoff(0.0);
        assert_eq!(1.0, spotlight.cos_cutoff());
    }
}
