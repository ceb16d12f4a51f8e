use glam::{Vec2, Vec3};
use rhai::{Array, Dynamic, INT};

use starling_engine::color::Color;
use starling_engine::renderer::{TextureInfo, PIXELFORMAT_UNCOMPRESSED_R8G8B8A8};
use starling_engine::surface::{
    color_from_array, color_to_array, constants_module, integer, number, rect_from_array,
    texture_from_array, texture_to_array, vec2_from_array, vec2_to_array, vec3_from_array,
    vec3_to_array,
};

fn ints(values: &[INT]) -> Array {
    values.iter().map(|v| Dynamic::from_int(*v)).collect()
}

fn floats(values: &[f64]) -> Array {
    values.iter().map(|v| Dynamic::from_float(*v)).collect()
}

#[test]
fn zero_alpha_becomes_opaque_on_input_only() {
    let color = color_from_array(&ints(&[10, 20, 30, 0])).expect("valid color");
    assert_eq!(color, Color::rgba(10, 20, 30, 255));
    // The output path reports the substituted alpha; converting the raw zero
    // again is not an identity.
    let back = color_to_array(color);
    let values: Vec<INT> = back.iter().map(|v| v.as_int().unwrap()).collect();
    assert_eq!(values, vec![10, 20, 30, 255]);
}

#[test]
fn nonzero_alpha_is_preserved() {
    let color = color_from_array(&ints(&[1, 2, 3, 40])).expect("valid color");
    assert_eq!(color.a, 40);
}

#[test]
fn omitted_alpha_defaults_to_opaque() {
    let color = color_from_array(&ints(&[7, 8, 9])).expect("three channels suffice");
    assert_eq!(color, Color::rgba(7, 8, 9, 255));
}

#[test]
fn color_rejects_non_integer_channels() {
    let mut bad = ints(&[1, 2]);
    bad.push(Dynamic::from("blue"));
    assert!(color_from_array(&bad).is_err());
    assert!(color_from_array(&ints(&[1, 2])).is_err());
}

#[test]
fn vec2_round_trips_exactly() {
    for (x, y) in [(0.0f32, 0.0f32), (1.5, -2.25), (-1000.125, 0.0625), (f32::MIN_POSITIVE, 1.0)] {
        let array = vec2_to_array(Vec2::new(x, y));
        let back = vec2_from_array(&array).expect("valid vector");
        assert_eq!(back, Vec2::new(x, y));
    }
}

#[test]
fn vec3_round_trips_exactly() {
    let v = Vec3::new(1.25, -3.5, 1024.0);
    assert_eq!(vec3_from_array(&vec3_to_array(v)).expect("valid vector"), v);
}

#[test]
fn vectors_accept_integer_elements() {
    assert_eq!(vec2_from_array(&ints(&[3, 4])).expect("ints coerce"), Vec2::new(3.0, 4.0));
}

#[test]
fn short_sequences_are_type_errors() {
    assert!(vec2_from_array(&floats(&[1.0])).is_err());
    assert!(vec3_from_array(&floats(&[1.0, 2.0])).is_err());
    assert!(rect_from_array(&floats(&[1.0, 2.0, 3.0])).is_err());
    assert!(texture_from_array(&ints(&[1, 2, 3, 4])).is_err());
}

#[test]
fn rect_reads_x_y_width_height() {
    let rect = rect_from_array(&floats(&[1.0, 2.0, 3.0, 4.0])).expect("valid rect");
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (1.0, 2.0, 3.0, 4.0));
}

#[test]
fn texture_tuple_round_trips() {
    let info = TextureInfo { id: 9, width: 64, height: 32, mipmaps: 1, format: PIXELFORMAT_UNCOMPRESSED_R8G8B8A8 };
    let back = texture_from_array(&texture_to_array(info)).expect("valid tuple");
    assert_eq!(back, info);
}

#[test]
fn number_accepts_ints_and_floats_only() {
    assert_eq!(number(&Dynamic::from_int(7)).expect("int"), 7.0);
    assert_eq!(number(&Dynamic::from_float(2.5)).expect("float"), 2.5);
    assert!(number(&Dynamic::from("seven")).is_err());
    assert!(integer(&Dynamic::from_float(2.5)).is_err());
}

#[test]
fn constants_module_carries_the_fixed_tables() {
    let module = constants_module();
    assert_eq!(module.get_var_value::<INT>("KEY_SPACE"), Some(32));
    assert_eq!(module.get_var_value::<INT>("KEY_A"), Some(65));
    assert_eq!(module.get_var_value::<INT>("MOUSE_BUTTON_LEFT"), Some(0));
    assert_eq!(module.get_var_value::<INT>("CAMERA_ORBITAL"), Some(2));
    assert_eq!(module.get_var_value::<INT>("CAMERA_PERSPECTIVE"), Some(0));

    let skyblue = module.get_var_value::<Array>("SKYBLUE").expect("palette entry");
    let channels: Vec<INT> = skyblue.iter().map(|v| v.as_int().unwrap()).collect();
    assert_eq!(channels, vec![102, 191, 255, 255]);
}
