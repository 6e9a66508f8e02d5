use super::*;

#[test]
fn rgb_packs_and_unpacks() {
    let c = Rgb8::from_u32(0x12ab_ef);
    assert_eq!(c, Rgb8::new(0x12, 0xab, 0xef));
    assert_eq!(c.to_u32(), 0x12ab_ef);
    assert_eq!(c.to_hex(), "#12abef");
}

#[test]
fn rgb_ignores_high_bits() {
    assert_eq!(Rgb8::from_u32(0xff00_0000), Rgb8::new(0, 0, 0));
}

#[test]
fn div_scale_guards_zero() {
    assert_eq!(div_scale(10.0, 2.0), 5.0);
    assert_eq!(div_scale(10.0, 0.0), 10.0);
    assert_eq!(div_scale(10.0, f64::NAN), 10.0);
}

#[test]
fn finite_or_replaces_nan() {
    assert_eq!(finite_or(f64::INFINITY, 1.0), 1.0);
    assert_eq!(finite_or(3.0, 1.0), 3.0);
}
