use glam::{Affine3A, Mat4, Vec2, Vec3};

use crate::scene::transform::Transform;
use crate::utils::ray::Ray;

/// Perspective camera.
///
/// The camera keeps its own [`Transform`] instead of living in the scene
/// graph: the viewer swaps scenes on load but the camera persists.
#[derive(Debug, Clone)]
pub struct Camera {
    pub transform: Transform,

    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            transform: Transform::new(),
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Recomputes world, view and view-projection matrices from the transform.
    pub fn update_matrix_world(&mut self) {
        self.transform.update_local_matrix();
        let world = *self.transform.local_matrix();
        self.transform.set_world_matrix(world);

        self.view_matrix = Mat4::from(world).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.transform.look_at(target, Vec3::Y);
        self.update_matrix_world();
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Unit vector the camera looks along (its -Z axis in world space).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.transform.rotation * Vec3::NEG_Z).normalize()
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        self.transform.world_matrix()
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_projection_matrix
    }

    /// Builds the world-space ray through a point in normalized device coordinates.
    ///
    /// `ndc` is in `[-1, 1]` on both axes with +Y up.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix.inverse();
        // Depth range 0..1: 0 is the near plane, 1 the far plane.
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(self.position(), far - near)
    }
}
