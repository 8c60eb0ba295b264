use approx::assert_relative_eq;
use scenery_animation_core::{sample_track, Keyframe, Value};

fn scalar_track() -> Vec<Keyframe> {
    vec![
        Keyframe::new(0.5, Value::f(10.0)),
        Keyframe::new(1.0, Value::f(20.0)),
        Keyframe::new(2.0, Value::f(0.0)),
    ]
}

fn float_at(keys: &[Keyframe], t: f32) -> f32 {
    sample_track(keys, t)
        .and_then(|v| v.as_float())
        .expect("float sample")
}

#[test]
fn clamps_before_first_and_after_last() {
    let keys = scalar_track();
    assert_eq!(float_at(&keys, 0.0), 10.0);
    assert_eq!(float_at(&keys, 0.5), 10.0);
    assert_eq!(float_at(&keys, 2.0), 0.0);
    assert_eq!(float_at(&keys, 9.0), 0.0);
}

#[test]
fn linear_between_keys() {
    let keys = scalar_track();
    assert_relative_eq!(float_at(&keys, 0.75), 15.0, epsilon = 1e-4);
    assert_relative_eq!(float_at(&keys, 1.5), 10.0, epsilon = 1e-4);
}

#[test]
fn exact_key_times_return_key_values() {
    let keys = scalar_track();
    assert_relative_eq!(float_at(&keys, 1.0), 20.0, epsilon = 1e-6);
}

#[test]
fn easing_then_bezier_compose() {
    let eased = vec![
        Keyframe::new(0.0, Value::f(0.0)).with_easing("quadIn"),
        Keyframe::new(1.0, Value::f(1.0)),
    ];
    assert_relative_eq!(float_at(&eased, 0.5), 0.25, epsilon = 1e-5);

    // Linear bezier leaves the eased ratio alone.
    let both = vec![
        Keyframe::new(0.0, Value::f(0.0))
            .with_easing("quadIn")
            .with_bezier([0.0, 0.0, 1.0, 1.0]),
        Keyframe::new(1.0, Value::f(1.0)),
    ];
    assert_relative_eq!(float_at(&both, 0.5), 0.25, epsilon = 1e-5);
}

#[test]
fn bool_and_text_hold_left_value() {
    let active = vec![
        Keyframe::new(0.0, Value::Bool(false)),
        Keyframe::new(1.0, Value::Bool(true)),
    ];
    assert_eq!(sample_track(&active, 0.99), Some(Value::Bool(false)));
    assert_eq!(sample_track(&active, 1.0), Some(Value::Bool(true)));

    let frames = vec![
        Keyframe::new(0.0, Value::Text("a.png".into())),
        Keyframe::new(0.5, Value::Text("b.png".into())),
        Keyframe::new(1.0, Value::Text("c.png".into())),
    ];
    assert_eq!(sample_track(&frames, 0.7), Some(Value::Text("b.png".into())));
}

#[test]
fn position_and_color_blend_componentwise() {
    let pos = vec![
        Keyframe::new(0.0, Value::vec2(0.0, 100.0)),
        Keyframe::new(1.0, Value::vec2(50.0, 0.0)),
    ];
    let p = sample_track(&pos, 0.5).and_then(|v| v.as_vec2()).unwrap();
    assert_relative_eq!(p[0], 25.0);
    assert_relative_eq!(p[1], 50.0);

    let col = vec![
        Keyframe::new(0.0, Value::rgb(255.0, 0.0, 0.0)),
        Keyframe::new(2.0, Value::rgb(0.0, 0.0, 255.0)),
    ];
    let c = sample_track(&col, 1.0).and_then(|v| v.as_rgb()).unwrap();
    assert_relative_eq!(c[0], 127.5);
    assert_relative_eq!(c[2], 127.5);
}

#[test]
fn single_key_track_is_constant() {
    let keys = vec![Keyframe::new(0.3, Value::f(7.0))];
    assert_eq!(float_at(&keys, 0.0), 7.0);
    assert_eq!(float_at(&keys, 5.0), 7.0);
}
