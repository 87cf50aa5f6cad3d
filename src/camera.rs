//! Free-fly camera and frame timing.
//!
//! Both are plain values: every frame the loop hands the previous [`Camera`] and
//! [`FrameClock`] in and gets the next ones back.

use glam::{Mat4, Vec3};

use crate::input::MoveKeys;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            speed: 2.5,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Unit vector pointing to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Returns the camera moved by `speed * delta_time` along each held direction.
    pub fn advance(self, keys: MoveKeys, delta_time: f32) -> Self {
        let step = self.speed * delta_time;
        let right = self.right();

        let mut position = self.position;
        if keys.forward {
            position += self.front * step;
        }
        if keys.back {
            position -= self.front * step;
        }
        if keys.left {
            position -= right * step;
        }
        if keys.right {
            position += right * step;
        }

        Self { position, ..self }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for a drawable of the given size in pixels.
    ///
    /// A collapsed drawable (minimized window) is treated as one pixel along that axis.
    pub fn projection(&self, width: u32, height: u32) -> Mat4 {
        let aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect_ratio, self.near, self.far)
    }
}

/// Timestamp of the previous frame, in seconds since startup.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    last_frame: f32,
}

impl FrameClock {
    /// Returns the clock positioned at `now` and the time elapsed since the previous frame.
    pub fn advance(self, now: f32) -> (Self, f32) {
        (Self { last_frame: now }, now - self.last_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORWARD: MoveKeys = MoveKeys {
        forward: true,
        back: false,
        left: false,
        right: false,
    };

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn one_second_forward_at_sixty_fps() {
        let mut camera = Camera::default();
        let mut clock = FrameClock::default();
        for frame in 1..=60 {
            let (next, delta_time) = clock.advance(frame as f32 / 60.0);
            clock = next;
            camera = camera.advance(FORWARD, delta_time);
        }
        assert!(approx(camera.position, Vec3::new(0.0, 0.0, 0.5)));
        assert!(approx(camera.position - Camera::default().position, camera.front * 2.5));
    }

    #[test]
    fn displacement_is_independent_of_frame_rate() {
        let uneven = [0.013, 0.2, 0.05, 0.337, 0.1, 0.3];
        let even = [1.0 / 120.0; 120];

        let a = uneven.iter().fold(Camera::default(), |c, &dt| c.advance(FORWARD, dt));
        let b = even.iter().fold(Camera::default(), |c, &dt| c.advance(FORWARD, dt));

        assert!(approx(a.position, b.position));
        assert!(approx(a.position, Vec3::new(0.0, 0.0, 0.5)));
    }

    #[test]
    fn strafing_follows_the_cross_product() {
        let keys = MoveKeys {
            right: true,
            ..MoveKeys::default()
        };
        let camera = Camera::default().advance(keys, 1.0);
        assert_eq!(Camera::default().right(), Vec3::X);
        assert!(approx(camera.position, Vec3::new(2.5, 0.0, 3.0)));

        let keys = MoveKeys {
            left: true,
            ..MoveKeys::default()
        };
        let camera = Camera::default().advance(keys, 0.4);
        assert!(approx(camera.position, Vec3::new(-1.0, 0.0, 3.0)));
    }

    #[test]
    fn opposite_keys_cancel() {
        let keys = MoveKeys {
            forward: true,
            back: true,
            left: true,
            right: true,
        };
        let camera = Camera::default().advance(keys, 0.5);
        assert!(approx(camera.position, Camera::default().position));
    }

    #[test]
    fn no_keys_means_no_movement() {
        let camera = Camera::default().advance(MoveKeys::default(), 10.0);
        assert_eq!(camera, Camera::default());
    }

    #[test]
    fn clock_reports_time_since_previous_frame() {
        let (clock, first) = FrameClock::default().advance(0.5);
        assert_eq!(first, 0.5);
        let (_, second) = clock.advance(0.75);
        assert_eq!(second, 0.25);
    }

    #[test]
    fn projection_tracks_aspect_ratio() {
        let camera = Camera::default();
        let square = camera.projection(800, 800);
        let wide = camera.projection(1600, 800);

        assert!((wide.x_axis.x - square.x_axis.x * 0.5).abs() < 1e-6);
        assert_eq!(wide.y_axis.y, square.y_axis.y);
        let focal = 1.0 / (22.5f32.to_radians()).tan();
        assert!((square.y_axis.y - focal).abs() < 1e-5);
        assert!((square.x_axis.x - focal).abs() < 1e-5);
    }

    #[test]
    fn collapsed_drawable_still_gives_finite_projection() {
        let projection = Camera::default().projection(800, 0);
        assert!(projection.is_finite());
    }

    #[test]
    fn view_looks_down_front() {
        let view = Camera::default().view();
        // A point straight ahead ends up on the negative view-space z axis.
        let ahead = view.transform_point3(Vec3::new(0.0, 0.0, -7.0));
        assert!(approx(ahead, Vec3::new(0.0, 0.0, -10.0)));
    }
}
