//! CPU mirror of the fragment shading in `scene.wgsl`
//!
//! Blinn-Phong with inverse-square falloff, followed by gamma encoding. Kept
//! in lockstep with the shader so the lighting math can be unit tested.

use cgmath::{ElementWise, InnerSpace, Vector3};

use crate::gfx::scene::Material;

pub const SCREEN_GAMMA: f32 = 2.2;

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
    pub power: f32,
}

/// Linear color at a world-space point, before gamma and texturing
///
/// The view direction is taken from the world origin, matching the shader.
pub fn blinn_phong(
    world_position: Vector3<f32>,
    normal: Vector3<f32>,
    light: &PointLight,
    material: &Material,
) -> Vector3<f32> {
    let normal = normal.normalize();
    let to_light = light.position - world_position;
    let distance_squared = to_light.magnitude2();
    let light_dir = to_light.normalize();

    let lambertian = light_dir.dot(normal).max(0.0);
    let mut specular = 0.0;
    if lambertian > 0.0 {
        let view_dir = (-world_position).normalize();
        let half_dir = (light_dir + view_dir).normalize();
        let spec_angle = half_dir.dot(normal).max(0.0);
        specular = spec_angle.powf(material.specular_power());
    }

    let falloff = light.color * light.power / distance_squared;
    Vector3::from(material.ambient_color)
        + Vector3::from(material.diffuse_color).mul_element_wise(falloff) * lambertian
        + Vector3::from(material.specular_color).mul_element_wise(falloff) * specular
}

pub fn gamma_encode(linear: Vector3<f32>) -> Vector3<f32> {
    let inv = 1.0 / SCREEN_GAMMA;
    Vector3::new(linear.x.powf(inv), linear.y.powf(inv), linear.z.powf(inv))
}

/// Final fragment color: gamma-encoded shading times the sampled texel
pub fn shade(
    world_position: Vector3<f32>,
    normal: Vector3<f32>,
    light: &PointLight,
    material: &Material,
    texel: [f32; 4],
) -> [f32; 4] {
    let color = gamma_encode(blinn_phong(world_position, normal, light, material));
    [
        texel[0] * color.x,
        texel[1] * color.y,
        texel[2] * color.z,
        texel[3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_above(height: f32) -> PointLight {
        PointLight {
            position: Vector3::new(1.0, height, 1.0),
            color: Vector3::new(1.0, 1.0, 1.0),
            power: 40.0,
        }
    }

    fn no_ambient() -> Material {
        let mut material = Material::default();
        material.ambient_color = [0.0; 3];
        material
    }

    #[test]
    fn test_back_facing_surface_gets_only_ambient() {
        let material = Material::default();
        let p = Vector3::new(1.0, 0.0, 1.0);
        let color = blinn_phong(p, Vector3::new(0.0, -1.0, 0.0), &light_above(2.0), &material);
        assert_eq!(color, Vector3::new(0.1, 0.1, 0.1));
    }

    #[test]
    fn test_inverse_square_falloff() {
        let mut material = no_ambient();
        material.specular_color = [0.0; 3];
        let p = Vector3::new(1.0, 0.0, 1.0);
        let up = Vector3::new(0.0, 1.0, 0.0);

        let near = blinn_phong(p, up, &light_above(1.0), &material);
        let far = blinn_phong(p, up, &light_above(2.0), &material);
        assert!((near.x / far.x - 4.0).abs() < 1e-4);
        // diffuse 0.5 * power 40 / distance 1
        assert!((near.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_unnormalized_normals_shade_like_unit_normals() {
        let material = Material::default();
        let p = Vector3::new(1.0, 0.0, 1.0);
        let a = blinn_phong(p, Vector3::new(0.0, 3.0, 0.0), &light_above(2.0), &material);
        let b = blinn_phong(p, Vector3::new(0.0, 1.0, 0.0), &light_above(2.0), &material);
        assert!((a - b).magnitude() < 1e-6);
    }

    #[test]
    fn test_gamma_and_texture_modulation() {
        let encoded = gamma_encode(Vector3::new(0.25, 1.0, 0.0));
        assert!((encoded.x - 0.25f32.powf(1.0 / 2.2)).abs() < 1e-6);
        assert_eq!(encoded.y, 1.0);

        let material = Material::default();
        let p = Vector3::new(1.0, 0.0, 1.0);
        let white = shade(p, Vector3::new(0.0, -1.0, 0.0), &light_above(2.0), &material, [1.0; 4]);
        let black = shade(p, Vector3::new(0.0, -1.0, 0.0), &light_above(2.0), &material, [0.0, 0.0, 0.0, 1.0]);
        assert!((white[0] - 0.1f32.powf(1.0 / 2.2)).abs() < 1e-6);
        assert_eq!(black[..3], [0.0, 0.0, 0.0]);
    }
}
