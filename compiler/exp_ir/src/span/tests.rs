use super::*;

#[test]
fn test_span_merge_is_min_max() {
    let a = Span::new(4, 9);
    let b = Span::new(2, 6);
    assert_eq!(a.merge(b), Span::new(2, 9));
    assert_eq!(b.merge(a), Span::new(2, 9));
}

#[test]
fn test_span_cover() {
    let spans = [Span::new(10, 12), Span::new(3, 4), Span::new(7, 20)];
    assert_eq!(Span::cover(spans), Some(Span::new(3, 20)));
    assert_eq!(Span::cover(Vec::new()), None);
}

#[test]
fn test_span_len_and_contains() {
    let span = Span::new(5, 8);
    assert_eq!(span.len(), 3);
    assert!(span.contains(5));
    assert!(span.contains(7));
    assert!(!span.contains(8));
    assert!(Span::point(3).is_empty());
}

#[test]
fn test_span_debug_format() {
    assert_eq!(format!("{:?}", Span::new(1, 4)), "1..4");
    assert_eq!(Span::from_range(2..6), Span::new(2, 6));
}
