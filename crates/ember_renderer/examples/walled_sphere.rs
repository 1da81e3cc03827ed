//! Demo driver: a matte sphere boxed in by colored walls, lit by a single
//! point light, written out as a PNG.

use ember_renderer::{
    Bvh, Camera, Color, DVec3, Light, Material, Plane, Primitive, RenderOptions, Scene, Sphere,
};
use std::f64::consts::PI;

fn main() {
    env_logger::init();

    let red = Material::matte(Color::new(0.9, 0.1, 0.0));
    let blue = Material::matte(Color::new(0.3, 0.1, 0.8));
    let green = Material::matte(Color::new(0.0, 0.7, 0.2));

    let primitives = vec![
        Primitive::from(Sphere::new(1.0, DVec3::new(4.0, 0.0, 0.0), red)),
        Primitive::from(Plane::new(DVec3::new(0.0, 3.0, 0.0), DVec3::Y, red)),
        Primitive::from(Plane::new(DVec3::new(0.0, -3.0, 0.0), DVec3::Y, blue)),
        Primitive::from(Plane::new(DVec3::new(0.0, 0.0, 3.0), DVec3::Z, green)),
        Primitive::from(Plane::new(DVec3::new(0.0, 0.0, -1.5), DVec3::Z, blue)),
        Primitive::from(Plane::new(DVec3::new(9.0, 0.0, 0.0), DVec3::X, Material::default())),
        Primitive::from(Plane::new(DVec3::new(-3.0, 0.0, 0.0), DVec3::X, blue)),
    ];

    let camera = Camera::new(
        DVec3::ZERO,
        DVec3::X,
        DVec3::Z,
        60.0 * PI / 180.0,
        450,
        800,
    );

    let mut scene = Scene::new(camera, Bvh::new(primitives));
    scene.add_light(Light::new(DVec3::new(2.0, -2.0, 2.0), DVec3::splat(40.0)));

    scene.render(&RenderOptions {
        max_depth: 3,
        samples: 50,
        anti_aliasing: true,
        progress_bar: true,
    });

    save_png(&scene, "walled_sphere.png").expect("failed to save image");
    println!("wrote walled_sphere.png");
}

/// Interleave the renderer's planar RGB buffer and encode it as PNG.
fn save_png(scene: &Scene, path: &str) -> Result<(), image::ImageError> {
    let (width, height) = (scene.width(), scene.height());
    let planar = scene.image();
    let plane = width * height;

    let mut interleaved = Vec::with_capacity(3 * plane);
    for p in 0..plane {
        interleaved.push(planar[p]);
        interleaved.push(planar[p + plane]);
        interleaved.push(planar[p + 2 * plane]);
    }

    image::save_buffer(
        path,
        &interleaved,
        width as u32,
        height as u32,
        image::ColorType::Rgb8,
    )
}
