// Row-major matrices; uploaded to GL with `transpose = true`.
pub type Mat4x4 = [f32; 16];
pub type Mat3x3 = [f32; 9];
pub type Vec3 = [f32; 3];

pub fn mat4x4_identity() -> Mat4x4 {
    [
      1.0, 0.0, 0.0, 0.0,
      0.0, 1.0, 0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_translate(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
      1.0, 0.0, 0.0,  x,
      0.0, 1.0, 0.0,  y,
      0.0, 0.0, 1.0,  z,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_scale(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
       x,  0.0, 0.0, 0.0,
      0.0,  y,  0.0, 0.0,
      0.0, 0.0,  z,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_rot_x(angle: f32) -> Mat4x4 {
    let c = angle.cos();
    let s = angle.sin();

    [
      1.0, 0.0, 0.0, 0.0,
      0.0,  c,  -s,  0.0,
      0.0,  s,   c,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_mul(a: Mat4x4, b: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for (i, out) in ret.iter_mut().enumerate() {
        let row = i / 4;
        let col = i % 4;
        *out = (0..4).map(|k| a[row * 4 + k] * b[k * 4 + col]).sum();
    }
    ret
}

/// OpenGL-style perspective projection (clip z in [-w, w]).
pub fn mat4x4_perspective(fov_y_radians: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4x4 {
    let f = 1.0 / (fov_y_radians * 0.5).tan();
    let range_inv = 1.0 / (near - far);

    [
        f / aspect_ratio, 0.0, 0.0,                          0.0,
        0.0,              f,   0.0,                          0.0,
        0.0,              0.0, (near + far) * range_inv,     (2.0 * near * far) * range_inv,
        0.0,              0.0, -1.0,                         0.0,
    ]
}

// Build view matrix from position and Euler angles
pub fn build_view_matrix(pos: Vec3, pitch: f32, yaw: f32) -> Mat4x4 {
    let (right, up, back) = view_basis(pitch, yaw);

    let tx = -vec3_dot(right, pos);
    let ty = -vec3_dot(up, pos);
    let tz = -vec3_dot(back, pos);

    [
        right[0], right[1], right[2], tx,
        up[0],    up[1],    up[2],    ty,
        back[0],  back[1],  back[2],  tz,
        0.0,      0.0,      0.0,      1.0,
    ]
}

/// Camera basis (right, up, back); the camera looks along `-back`.
pub fn view_basis(pitch: f32, yaw: f32) -> (Vec3, Vec3, Vec3) {
    let cp = pitch.cos();
    let sp = pitch.sin();
    let cy = yaw.cos();
    let sy = yaw.sin();

    let back = [-sy * cp, sp, cy * cp];
    let right = [cy, 0.0, sy];
    let up = [sy * sp, cp, -cy * sp];
    (right, up, back)
}

pub fn vec3_dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn vec3_add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn vec3_scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: &[f32], b: &[f32]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_identity_is_neutral() {
        let t = mat4x4_translate(1.0, 2.0, 3.0);
        assert_eq!(mat4x4_mul(mat4x4_identity(), t), t);
        assert_eq!(mat4x4_mul(t, mat4x4_identity()), t);
    }

    #[test]
    fn test_rot_x_turns_y_into_z() {
        let m = mat4x4_rot_x(std::f32::consts::FRAC_PI_2);
        // Column 1 holds the image of +y.
        assert!(approx_eq(&[m[1], m[5], m[9]], &[0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_view_matrix_moves_world_opposite_to_camera() {
        let view = build_view_matrix([0.0, 0.0, 3.0], 0.0, 0.0);
        // Origin ends up 3 units in front of the camera (negative z).
        assert!(approx_eq(&[view[3], view[7], view[11]], &[0.0, 0.0, -3.0]));
    }

    #[test]
    fn test_view_basis_is_orthonormal() {
        let (r, u, b) = view_basis(0.4, -1.1);
        assert!(vec3_dot(r, u).abs() < 1e-5);
        assert!(vec3_dot(r, b).abs() < 1e-5);
        assert!(vec3_dot(u, b).abs() < 1e-5);
        assert!((vec3_dot(b, b) - 1.0).abs() < 1e-5);
    }
}
