use super::*;

fn visual(w: u32, h: u32, x: f64, y: f64) -> Visual {
    Visual::at(Surface::solid(w, h, [255, 255, 255, 255]), Point::new(x, y))
}

fn sample(effect: &Effect, progress: f64, input: &Visual) -> Visual {
    effect
        .sample(progress, Ease::Linear, input)
        .unwrap()
        .expect("effect produces a visual")
}

#[test]
fn span_reversal_swaps_endpoints() {
    let s = Span::new(1.0, 2.0).reversed();
    assert_eq!(s, Span::new(2.0, 1.0));
    let partial = Span::to(5.0).reversed();
    assert_eq!(partial.start, Some(5.0));
    assert_eq!(partial.end, None);
}

#[test]
fn waves_hit_their_peaks() {
    let quarter = TAU / 4.0;
    assert!((Wave::Sin.eval(quarter) - 1.0).abs() < 1e-12);
    assert!((Wave::Cos.eval(0.0) - 1.0).abs() < 1e-12);
    assert!((Wave::Triangle.eval(quarter) - 1.0).abs() < 1e-12);
    assert!((Wave::Triangle.eval(3.0 * quarter) + 1.0).abs() < 1e-12);
    assert_eq!(Wave::Square.eval(0.1), 1.0);
    assert_eq!(Wave::Square.eval(TAU * 0.75), -1.0);
    assert_eq!(Wave::Saw.eval(0.0), -1.0);
    assert_eq!(Wave::Zero.eval(1.234), 0.0);
}

#[test]
fn fade_rounds_and_clamps_alpha() {
    let input = visual(4, 4, 0.0, 0.0);
    let effect = Leaf::Fade(Fade {
        range: Span::new(0.0, 255.0),
    })
    .resolve(&input, &input)
    .unwrap();
    assert_eq!(sample(&effect, 0.5, &input).image.alpha(), 128);
    assert_eq!(sample(&effect, 1.0, &input).image.alpha(), 255);

    let overshoot = Leaf::Fade(Fade {
        range: Span::new(0.0, 400.0),
    })
    .resolve(&input, &input)
    .unwrap();
    assert_eq!(sample(&overshoot, 1.0, &input).image.alpha(), 255);
}

#[test]
fn unset_fade_start_uses_current_alpha() {
    let input = Visual::new(
        Surface::solid(2, 2, [0, 0, 0, 255]).with_alpha(100),
        Rect::new(0.0, 0.0, 2.0, 2.0),
    );
    let effect = Leaf::Fade(Fade {
        range: Span::to(0.0),
    })
    .resolve(&input, &input)
    .unwrap();
    assert_eq!(effect, Effect::Fade { from: 100.0, to: 0.0 });
}

#[test]
fn scale_to_resolves_from_base_size_and_keeps_anchor() {
    let input = visual(10, 10, 100.0, 100.0);
    let leaf = Leaf::Transform(Transform {
        range: Span::to(Value::Pair(20.0, 30.0)),
        anchor: Anchor::Center,
        func: TransformFn::ScaleTo,
    });
    let effect = leaf.resolve(&input, &input).unwrap();
    let out = sample(&effect, 1.0, &input);
    assert_eq!(out.image.size(), Size::new(20.0, 30.0));
    assert_eq!(Anchor::Center.point(out.rect), Point::new(105.0, 105.0));

    let halfway = sample(&effect, 0.5, &input);
    assert_eq!(halfway.image.size(), Size::new(15.0, 20.0));
}

#[test]
fn scale_to_start_ignores_earlier_scaling() {
    let base = visual(10, 10, 0.0, 0.0);
    let input = visual(20, 20, 0.0, 0.0);
    let leaf = Leaf::Transform(Transform {
        range: Span::to(Value::Pair(40.0, 40.0)),
        anchor: Anchor::TopLeft,
        func: TransformFn::ScaleTo,
    });
    let effect = leaf.resolve(&input, &base).unwrap();
    assert_eq!(sample(&effect, 0.0, &input).image.size(), Size::new(10.0, 10.0));
    assert_eq!(sample(&effect, 0.5, &input).image.size(), Size::new(25.0, 25.0));
}

#[test]
fn shape_mismatch_is_invalid_argument() {
    let input = visual(4, 4, 0.0, 0.0);
    let effect = Leaf::Transform(Transform {
        range: Span::new(Value::Scalar(1.0), Value::Pair(2.0, 2.0)),
        ..Transform::default()
    })
    .resolve(&input, &input)
    .unwrap();
    let err = effect.sample(0.5, Ease::Linear, &input).unwrap_err();
    assert!(matches!(err, KinemaError::InvalidArgument(_)));

    let rotate_pair = Leaf::Transform(Transform {
        range: Span::new(Value::Pair(0.0, 0.0), Value::Pair(1.0, 1.0)),
        func: TransformFn::Rotate,
        ..Transform::default()
    })
    .resolve(&input, &input)
    .unwrap();
    assert!(rotate_pair.sample(1.0, Ease::Linear, &input).is_err());
}

#[test]
fn custom_transform_needs_both_endpoints() {
    let hook = TransformHook::new(|s, _| Ok(s.clone()));
    let leaf = Leaf::Transform(Transform {
        range: Span::to(Value::Scalar(1.0)),
        anchor: Anchor::TopLeft,
        func: TransformFn::Custom(hook),
    });
    let input = visual(2, 2, 0.0, 0.0);
    let err = leaf.resolve(&input, &input).unwrap_err();
    assert!(err.to_string().starts_with("invalid argument:"));
}

#[test]
fn move_to_resolves_from_anchor_point() {
    let input = visual(10, 10, 5.0, 5.0);
    let leaf = Leaf::MoveTo(MoveTo {
        range: Span::to(Point::new(50.0, 50.0)),
        anchor: Anchor::BottomRight,
    });
    let effect = leaf.resolve(&input, &input).unwrap();
    assert_eq!(
        effect,
        Effect::MoveTo {
            from: Point::new(15.0, 15.0),
            to: Point::new(50.0, 50.0),
            anchor: Anchor::BottomRight,
        }
    );
    let out = sample(&effect, 1.0, &input);
    assert_eq!(out.rect, Rect::new(40.0, 40.0, 50.0, 50.0));
}

#[test]
fn move_by_offsets_the_incoming_rect() {
    let input = visual(4, 4, 1.0, 2.0);
    let effect = Leaf::MoveBy(MoveBy {
        range: Span::to(Vec2::new(10.0, -4.0)),
    })
    .resolve(&input, &input)
    .unwrap();
    let out = sample(&effect, 0.5, &input);
    assert_eq!(out.rect.origin(), Point::new(6.0, 0.0));
}

#[test]
fn shake_returns_home_at_the_end_of_a_cycle() {
    let input = visual(4, 4, 0.0, 0.0);
    let effect = Leaf::Shake(Shake::default()).resolve(&input, &input).unwrap();
    let peak = sample(&effect, 0.25, &input);
    assert!((peak.rect.x0 - 10.0).abs() < 1e-9);
    let end = sample(&effect, 1.0, &input);
    assert!(end.rect.x0.abs() < 1e-9);
    assert_eq!(end.rect.y0, 0.0);
}

#[test]
fn erase_resolves_fractions_against_size() {
    let input = visual(10, 4, 0.0, 0.0);
    let effect = Leaf::Erase(Erase {
        size: Vec2::new(0.5, 1.0),
        ..Erase::default()
    })
    .resolve(&input, &input)
    .unwrap();
    let out = sample(&effect, 0.0, &input);
    let px = out.image.pixels();
    assert_eq!(px.get_pixel(0, 0).0[3], 0);
    assert_eq!(px.get_pixel(4, 3).0[3], 0);
    assert_eq!(px.get_pixel(5, 0).0[3], 255);
    assert_eq!(out.rect, input.rect);
}

#[test]
fn delay_passes_input_through_and_act_yields_nothing() {
    let input = visual(3, 3, 7.0, 7.0);
    assert_eq!(sample(&Effect::Delay, 0.3, &input), input);

    let seen = std::rc::Rc::new(std::cell::Cell::new(-1.0));
    let seen2 = seen.clone();
    let act = Effect::Act(ActHook::new(move |p, _| {
        seen2.set(p);
        Ok(())
    }));
    assert_eq!(act.sample(0.4, Ease::InQuad, &input).unwrap(), None);
    assert_eq!(seen.get(), 0.4);
}

#[test]
fn reversal_leaves_flip_untouched() {
    let flip = Leaf::Flip(Flip { x: true, y: true });
    assert_eq!(flip.reversed(), flip);
    let fade = Leaf::Fade(Fade::default());
    assert_eq!(
        fade.reversed(),
        Leaf::Fade(Fade {
            range: Span::new(255.0, 0.0)
        })
    );
}

#[test]
fn default_cover_behavior_per_kind() {
    assert!(Leaf::Fade(Fade::default()).covers_by_default());
    assert!(Leaf::MoveTo(MoveTo::default()).covers_by_default());
    assert!(Leaf::Flip(Flip::default()).covers_by_default());
    assert!(!Leaf::Delay.covers_by_default());
    assert!(!Leaf::Shake(Shake::default()).covers_by_default());
    assert!(!Leaf::Erase(Erase::default()).covers_by_default());
}
