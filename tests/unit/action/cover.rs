use super::*;
use crate::foundation::core::{Point, Vec2};
use crate::visual::surface::Surface;

fn base() -> Visual {
    Visual::at(Surface::solid(4, 4, [255, 0, 0, 255]), Point::new(10.0, 10.0))
}

#[test]
fn cover_applies_the_final_state() {
    let cover = Cover::from_leaf(&Action::move_by(100, Vec2::new(5.0, -5.0)), &base()).unwrap();
    assert_eq!(cover.kind(), "move_by");
    let out = cover.apply(base()).unwrap();
    assert_eq!(out.rect.origin(), Point::new(15.0, 5.0));
}

#[test]
fn covers_compose_in_order() {
    let fade = Cover::from_leaf(&Action::fade(10, 255.0, 60.0), &base()).unwrap();
    let shift = Cover::from_leaf(&Action::move_by(10, Vec2::new(1.0, 0.0)), &base()).unwrap();
    let out = compose(base(), &[fade.clone(), shift.clone(), shift]).unwrap();
    assert_eq!(out.image.alpha(), 60);
    assert_eq!(out.rect.origin(), Point::new(12.0, 10.0));
    assert_eq!(compose(base(), &[]).unwrap(), base());
}

#[test]
fn non_leaf_actions_cannot_cover() {
    let err = Cover::from_leaf(&Action::clear(), &base()).unwrap_err();
    assert!(matches!(err, KinemaError::InvalidArgument(_)));
    let group = Action::delay(1) >> Action::delay(2);
    assert!(Cover::from_leaf(&group, &base()).is_err());
}
