//! The recursive radiance estimator.
//!
//! `get_color` combines three parts at every hit:
//!
//! - direct lighting from shadow rays toward every point light,
//! - indirect diffusion, sampled over a cosine-weighted hemisphere,
//! - reflection/refraction, sampled by Schlick reflectance.
//!
//! The material's `opacity` (alpha) and `fraction_diffuse` (beta) steer how
//! many samples each part receives; paths whose accumulated contribution
//! falls under a threshold are cut short.

use std::f64::consts::PI;

use rand::RngCore;

use crate::container::Container;
use crate::intersection::Intersection;
use crate::light::Light;
use crate::material::{Color, Material};
use crate::sampling::{cosine_hemisphere, gen_f64};
use ember_math::{DVec3, Point, Ray};

/// Paths contributing less than this to their pixel are not followed.
const MIN_CONTRIBUTION: f64 = 0.01;

/// Above this branch probability only the dominant branch is sampled.
const BRANCH_SATURATION: f64 = 0.999;

/// Relative advance applied to refracted ray origins, pushing them through
/// the surface. Stacks on top of the shrink `Ray::at` always applies.
const REFRACTION_ADVANCE: f64 = 1e-4;

/// Schlick approximation of the reflection coefficient at a dielectric
/// interface. `cos_i` is the dot of the incoming direction with a normal
/// oriented toward the ray origin, hence non-positive on entry.
pub(crate) fn fresnel_reflectance(cos_i: f64, eta_in: f64, eta_out: f64) -> f64 {
    let k0 = ((eta_in - eta_out) / (eta_in + eta_out)).powi(2);
    let c = 1.0 + cos_i;
    k0 + (1.0 - k0) * c.powi(5)
}

/// Borrowed view of the scene handed to the estimators.
pub(crate) struct Tracer<'a> {
    pub objects: &'a dyn Container,
    pub lights: &'a [Light],
}

impl Tracer<'_> {
    /// Radiance carried back along `ray`.
    ///
    /// `depth` bounds the remaining recursion, `samples` the number of draws
    /// handed to each sampled part, `index` is the refractive index of the
    /// current medium and `intensity` the contribution of this path to its
    /// pixel.
    pub fn get_color(
        &self,
        ray: &Ray,
        depth: u32,
        samples: u32,
        index: f64,
        intensity: f64,
        rng: &mut dyn RngCore,
    ) -> Color {
        if intensity < MIN_CONTRIBUTION {
            return Color::ZERO;
        }
        let Some(inter) = self.objects.intersect(ray) else {
            return Color::ZERO;
        };

        let object = inter.primitive;
        let material = *object.material();
        let point = Point::with_barycentric(ray.at(inter.t), inter.barycentric);
        let normal = object.normal(&point);

        // At the recursion floor (or with no sampling budget) the surface is
        // treated as opaque and purely direct.
        let (alpha, beta) = if depth == 0 || samples == 0 {
            (1.0, 0.0)
        } else {
            (material.opacity, material.fraction_diffuse)
        };

        let diffuse_color = if alpha != 0.0 {
            object.diffuse_color(&point)
        } else {
            Color::ZERO
        };
        let specular_color = if material.specular_weight != 0.0 || alpha != 1.0 {
            object.specular_color(&point)
        } else {
            Color::ZERO
        };

        let mut indirect = Color::ZERO;
        if !(alpha == 1.0 && beta == 0.0) {
            let fraction_diffuse = alpha * beta / (1.0 - alpha * (1.0 - beta));
            if fraction_diffuse >= BRANCH_SATURATION {
                indirect = self.brdf_color(
                    samples,
                    depth,
                    alpha * beta * intensity,
                    diffuse_color,
                    normal,
                    &point,
                    index,
                    rng,
                );
            } else if fraction_diffuse <= 1.0 - BRANCH_SATURATION {
                indirect = self.transmission_reflection_color(
                    samples,
                    depth,
                    (1.0 - alpha) * intensity,
                    ray,
                    &inter,
                    &material,
                    specular_color,
                    index,
                    normal,
                    rng,
                );
            } else {
                let mut accumulated = Color::ZERO;
                for _ in 0..samples {
                    if gen_f64(rng) <= fraction_diffuse {
                        accumulated += self.brdf_color(
                            1,
                            depth,
                            alpha * beta * intensity,
                            diffuse_color,
                            normal,
                            &point,
                            index,
                            rng,
                        );
                    } else {
                        accumulated += self.transmission_reflection_color(
                            1,
                            depth,
                            (1.0 - alpha) * intensity,
                            ray,
                            &inter,
                            &material,
                            specular_color,
                            index,
                            normal,
                            rng,
                        );
                    }
                }
                indirect = accumulated / samples as f64;
            }
        }

        let direct = self.light_intensity(
            &point,
            normal,
            ray,
            &material,
            diffuse_color,
            specular_color,
            alpha,
            beta,
        );
        (1.0 - alpha * (1.0 - beta)) * indirect + direct
    }

    /// Direct illumination at `point`: for every visible light, a Lambert
    /// term scaled by the direct-diffuse fraction plus, when the material
    /// has a specular weight, a Phong-style highlight.
    #[allow(clippy::too_many_arguments)]
    fn light_intensity(
        &self,
        point: &Point,
        normal: DVec3,
        ray: &Ray,
        material: &Material,
        diffuse_color: Color,
        specular_color: Color,
        alpha: f64,
        beta: f64,
    ) -> Color {
        let direct_diffuse = alpha * (1.0 - beta);
        if direct_diffuse == 0.0 && material.specular_weight == 0.0 {
            return Color::ZERO;
        }

        let mut total = Color::ZERO;
        for light in self.lights {
            let to_light = light.source() - point.pos;
            let shadow_ray = Ray::new(point.pos, to_light);

            let visible = match self.objects.intersect(&shadow_ray) {
                None => true,
                Some(hit) => hit.t * hit.t >= to_light.length_squared(),
            };
            if !visible {
                continue;
            }

            let falloff = light.intensity() / (PI * to_light.length_squared());
            let lambert = shadow_ray.direction().dot(normal).max(0.0);
            total += lambert * direct_diffuse * falloff * diffuse_color;

            if material.specular_weight > 0.0 {
                let d = shadow_ray.direction();
                let mirror = (d - 2.0 * d.dot(normal) * normal).normalize();
                let highlight = mirror.dot(ray.direction()).max(0.0).powf(material.shininess);
                total += material.specular_weight * highlight * falloff * specular_color;
            }
        }
        total
    }

    /// Indirect diffusion: `samples` cosine-weighted bounces around the
    /// normal, each recursing with a single sample. The cosine/pi factor of
    /// the Lambert BRDF cancels against the sampling density, leaving
    /// `(sum / (N * pi)) * diffuse`.
    #[allow(clippy::too_many_arguments)]
    fn brdf_color(
        &self,
        samples: u32,
        depth: u32,
        intensity: f64,
        diffuse_color: Color,
        normal: DVec3,
        point: &Point,
        index: f64,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut accumulated = Color::ZERO;
        for _ in 0..samples {
            let direction = cosine_hemisphere(normal, gen_f64(rng), gen_f64(rng));
            let bounce = Ray::new(point.pos, direction);
            accumulated += self.get_color(&bounce, depth - 1, 1, index, intensity, rng);
        }
        accumulated / (samples as f64 * PI) * diffuse_color
    }

    /// Reflection and refraction, weighted by Schlick reflectance.
    ///
    /// When the reflectance saturates toward 0 or 1 only the dominant branch
    /// is followed with the full sample budget; otherwise every draw picks a
    /// branch with the reflectance as probability.
    #[allow(clippy::too_many_arguments)]
    fn transmission_reflection_color(
        &self,
        samples: u32,
        depth: u32,
        intensity: f64,
        ray: &Ray,
        inter: &Intersection,
        material: &Material,
        specular_color: Color,
        index: f64,
        normal: DVec3,
        rng: &mut dyn RngCore,
    ) -> Color {
        // The normal faces the ray origin, so cos_i <= 0 on entry; Schlick's
        // c = 1 + cos_i relies on this sign.
        let cos_i = ray.direction().dot(normal);
        let (eta_in, eta_out) = if inter.front {
            (index, material.refractive_index)
        } else {
            (material.refractive_index, index)
        };
        let ratio = eta_in / eta_out;

        let mut refraction = None;
        if material.refractive {
            let discriminant = 1.0 - ratio * ratio * (1.0 - cos_i * cos_i);
            if discriminant > 0.0 {
                let transmitted =
                    (ratio * ray.direction() - (ratio * cos_i + discriminant.sqrt()) * normal)
                        .normalize();
                // Start past the surface; crossing a thin (flat) surface
                // switches the ambient medium to the material's.
                let origin = ray.at(inter.t * (1.0 + REFRACTION_ADVANCE));
                let next_index = if inter.primitive.is_flat() {
                    material.refractive_index
                } else {
                    index
                };
                refraction = Some((Ray::new(origin, transmitted), next_index));
            }
        }

        let reflected = Ray::new(
            ray.at(inter.t),
            ray.direction() - 2.0 * cos_i * normal,
        );

        match refraction {
            None => {
                self.get_color(&reflected, depth - 1, samples, index, intensity, rng)
                    * specular_color
            }
            Some((refracted, next_index)) => {
                let reflectance = fresnel_reflectance(cos_i, eta_in, eta_out);
                if reflectance >= BRANCH_SATURATION {
                    self.get_color(&reflected, depth - 1, samples, index, intensity, rng)
                        * specular_color
                } else if reflectance <= 1.0 - BRANCH_SATURATION {
                    self.get_color(&refracted, depth - 1, samples, next_index, intensity, rng)
                        * material.transparent
                } else {
                    let mut accumulated = Color::ZERO;
                    for _ in 0..samples {
                        if gen_f64(rng) <= reflectance {
                            accumulated += self.get_color(
                                &reflected,
                                depth - 1,
                                1,
                                index,
                                reflectance * intensity,
                                rng,
                            ) * specular_color;
                        } else {
                            accumulated += self.get_color(
                                &refracted,
                                depth - 1,
                                1,
                                next_index,
                                (1.0 - reflectance) * intensity,
                                rng,
                            ) * material.transparent;
                        }
                    }
                    accumulated / samples as f64
                }
            }
        }
    }
}
