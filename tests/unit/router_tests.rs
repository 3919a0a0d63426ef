// Route table tests

use kagami::error::TransformError;
use kagami::router::{Dispatcher, ROUTES};
use kagami::storage::KeyPattern;
use kagami::transform::{Anchor, FitMode, Gravity, Strategy};
use rstest::rstest;

fn dispatcher() -> Dispatcher {
    Dispatcher::new(KeyPattern::default())
}

#[rstest]
#[case("/photo/resize/w100", FitMode::Cover, Some(100), None)]
#[case("/photo/cover/h50", FitMode::Cover, None, Some(50))]
#[case("/photo/resize/300x200", FitMode::Cover, Some(300), Some(200))]
#[case("/photo/contain/800x800", FitMode::Contain, Some(800), Some(800))]
#[case("/photo/fill/10x20", FitMode::Fill, Some(10), Some(20))]
#[case("/photo/inside/9999x1", FitMode::Inside, Some(9999), Some(1))]
#[case("/photo/outside/64x64/webp", FitMode::Outside, Some(64), Some(64))]
fn test_resize_shapes(
    #[case] path: &str,
    #[case] fit: FitMode,
    #[case] width: Option<u32>,
    #[case] height: Option<u32>,
) {
    let request = dispatcher().dispatch(path).unwrap();
    let resize = request.resize.expect("resize descriptor");
    assert_eq!(resize.fit, fit);
    assert_eq!(resize.width, width);
    assert_eq!(resize.height, height);
    assert_eq!(request.filename, "photo");
}

#[rstest]
#[case("/")]
#[case("/photo/resize/w0")]
#[case("/photo/resize/w012")]
#[case("/photo/resize/w10000")]
#[case("/photo/fill/w100")]
#[case("/photo/contain/w100")]
#[case("/photo/Resize/w100")]
#[case("/photo/cover/middle/100x100")]
#[case("/photo/contain/attention/100x100")]
#[case("/a/b/c/d/e/f/g")]
fn test_unmatched_paths_are_not_found(#[case] path: &str) {
    let err = dispatcher().dispatch(path).unwrap_err();
    assert!(matches!(err, TransformError::RouteNotFound), "{}", path);
}

#[test]
fn test_passthrough_with_parameters() {
    let request = dispatcher().dispatch("/logo.svg/quality(50)png").unwrap();
    assert!(request.resize.is_none());
    assert_eq!(request.filename, "logo.svg");
    assert_eq!(request.cosmetic.quality, Some(50));
}

#[test]
fn test_bare_filename() {
    let request = dispatcher().dispatch("/photo").unwrap();
    assert!(request.resize.is_none());
    assert!(request.cosmetic.is_empty());
}

#[test]
fn test_unlarge_disables_enlargement() {
    let request = dispatcher().dispatch("/photo/unlarge/resize/w100").unwrap();
    assert!(!request.resize.unwrap().allow_enlargement);

    let request = dispatcher().dispatch("/photo/resize/w100").unwrap();
    assert!(request.resize.unwrap().allow_enlargement);
}

#[test]
fn test_contain_background_and_anchor_in_either_order() {
    let first = dispatcher()
        .dispatch("/photo/contain/bg(%23ff0000)/left-top/100x50")
        .unwrap()
        .resize
        .unwrap();
    let second = dispatcher()
        .dispatch("/photo/contain/left-top/bg(%23ff0000)/100x50")
        .unwrap()
        .resize
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.background, "(#ff0000)");
    assert_eq!(first.anchor, Anchor::Gravity(Gravity::NorthWest));
}

#[test]
fn test_cover_strategy_anchor() {
    let resize = dispatcher()
        .dispatch("/owl/cover/entropy/120x80")
        .unwrap()
        .resize
        .unwrap();
    assert_eq!(resize.anchor, Anchor::Strategy(Strategy::Entropy));
}

#[test]
fn test_key_pattern_applied() {
    let dispatcher = Dispatcher::new(KeyPattern::new("images/:filename"));
    let request = dispatcher.dispatch("/cat%20photo.jpg/resize/w10").unwrap();
    assert_eq!(request.filename, "cat photo.jpg");
    assert_eq!(request.source_key, "images/cat photo.jpg");
}

#[test]
fn test_route_names_are_unique() {
    let mut names: Vec<&str> = ROUTES.iter().map(|route| route.name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), ROUTES.len());
    assert_eq!(ROUTES.last().map(|route| route.name), Some("passthrough"));
}
