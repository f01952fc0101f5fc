//! Motion controller: yaw-only поворот и прямолинейное движение NPC
//!
//! Используется несколькими состояниями FSM (Idle/Walk/Wave/...).
//! Forward NPC = Bevy forward (-Z), вращение только вокруг +Y.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

/// Минимальная горизонтальная дистанция, при которой направление считается определённым
const MIN_DIRECTION_LENGTH: f32 = 1e-4;

/// Yaw (рад) для направления: yaw = 0 смотрит в -Z
pub fn yaw_of(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z)
}

/// Текущий yaw NPC (pitch/roll игнорируются)
pub fn facing_yaw(transform: &Transform) -> f32 {
    yaw_of(*transform.forward())
}

/// Нормализует угол в [-PI, PI)
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Поворачивает NPC к target только по yaw
///
/// Target проецируется на ground plane (y = ground_height), направление берётся
/// в горизонтальной плоскости. Поворот ограничен `max_radians` за вызов.
/// Возвращает оставшийся угол до цели (0 если направление вырожденное).
pub fn rotate_yaw_towards(
    transform: &mut Transform,
    target: Vec3,
    ground_height: f32,
    max_radians: f32,
) -> f32 {
    let projected = Vec3::new(target.x, ground_height, target.z);
    let mut direction = projected - transform.translation;
    direction.y = 0.0;

    if direction.length() < MIN_DIRECTION_LENGTH {
        return 0.0;
    }

    let current = facing_yaw(transform);
    let delta = wrap_angle(yaw_of(direction) - current);
    let step = delta.clamp(-max_radians.abs(), max_radians.abs());

    transform.rotation = Quat::from_rotation_y(current + step);

    (delta - step).abs()
}

/// Шаг к target не больше `max_distance`, без перелёта
pub fn move_towards(current: Vec3, target: Vec3, max_distance: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();

    if distance <= max_distance || distance <= f32::EPSILON {
        target
    } else {
        current + offset / distance * max_distance
    }
}
