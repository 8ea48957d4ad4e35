use bevy::prelude::*;

/// World terrain elevation data. Loaded over the API; terrain renderers and
/// height-following movers refuse to operate while it is empty.
#[derive(Resource, Default)]
pub struct Terrain {
    pub height_field: Option<HeightField>,
}

impl Terrain {
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.height_field.as_ref().map(|hf| hf.height_at(x, z))
    }
}

/// Row-major grid of elevations, `spacing` world units between samples.
#[derive(Clone, Debug)]
pub struct HeightField {
    pub width: usize,
    pub depth: usize,
    pub spacing: f32,
    pub heights: Vec<f32>,
}

impl HeightField {
    pub fn new(width: usize, depth: usize, spacing: f32, heights: Vec<f32>) -> Result<Self, String> {
        if width == 0 || depth == 0 {
            return Err("width and depth must be positive".to_string());
        }
        if !(spacing > 0.0) {
            return Err("spacing must be positive".to_string());
        }
        if heights.len() != width * depth {
            return Err(format!(
                "heights has {} samples, expected width * depth = {}",
                heights.len(),
                width * depth
            ));
        }
        Ok(Self {
            width,
            depth,
            spacing,
            heights,
        })
    }

    /// Bilinearly interpolated elevation at a world position, clamped to the
    /// grid borders.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let gx = (x / self.spacing).clamp(0.0, (self.width - 1) as f32);
        let gz = (z / self.spacing).clamp(0.0, (self.depth - 1) as f32);
        let x0 = gx.floor() as usize;
        let z0 = gz.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);
        let fx = gx - x0 as f32;
        let fz = gz - z0 as f32;

        let h00 = self.heights[z0 * self.width + x0];
        let h10 = self.heights[z0 * self.width + x1];
        let h01 = self.heights[z1 * self.width + x0];
        let h11 = self.heights[z1 * self.width + x1];

        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        near + (far - near) * fz
    }

    pub fn min_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.heights
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_sample_count() {
        let err = HeightField::new(3, 3, 1.0, vec![0.0; 8]).expect_err("8 != 9");
        assert!(err.contains("expected width * depth"));
        assert!(HeightField::new(0, 3, 1.0, vec![]).is_err());
        assert!(HeightField::new(2, 2, 0.0, vec![0.0; 4]).is_err());
    }

    #[test]
    fn samples_flat_field_everywhere() {
        let hf = HeightField::new(2, 2, 10.0, vec![3.0; 4]).expect("valid field");
        assert_eq!(hf.height_at(0.0, 0.0), 3.0);
        assert_eq!(hf.height_at(5.0, 5.0), 3.0);
        assert_eq!(hf.height_at(10.0, 10.0), 3.0);
    }

    #[test]
    fn interpolates_between_samples() {
        // slope rising from 0 to 4 along x
        let hf = HeightField::new(2, 2, 2.0, vec![0.0, 4.0, 0.0, 4.0]).expect("valid field");
        assert!((hf.height_at(1.0, 0.0) - 2.0).abs() < 1e-5);
        assert!((hf.height_at(0.5, 1.3) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn clamps_outside_the_grid() {
        let hf = HeightField::new(2, 2, 1.0, vec![1.0, 2.0, 3.0, 4.0]).expect("valid field");
        assert_eq!(hf.height_at(-50.0, -50.0), 1.0);
        assert_eq!(hf.height_at(50.0, 50.0), 4.0);
        assert_eq!(hf.min_height(), 1.0);
        assert_eq!(hf.max_height(), 4.0);
    }
}
