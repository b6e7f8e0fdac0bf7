use itertools::assert_equal;

use tensorview::{s, Ix, TensorView};

fn coords_of_iter<A: Clone>(v: &TensorView<A>) -> Vec<Vec<Ix>> {
    v.iter().map(|(_, coords)| coords).collect()
}

#[test]
fn iteration_is_row_major() {
    let v = TensorView::from_shape_vec(&[2, 3], (0..6).collect::<Vec<i32>>()).unwrap();
    assert_equal(v.iter().map(|(value, _)| value), 0..6);
    assert_equal(
        coords_of_iter(&v),
        vec![
            vec![0, 0],
            vec![0, 1],
            vec![0, 2],
            vec![1, 0],
            vec![1, 1],
            vec![1, 2],
        ],
    );
}

#[test]
fn iteration_covers_exactly_len_items() {
    let v = TensorView::from_shape_vec(&[2, 3, 4], (0..24).collect::<Vec<i32>>()).unwrap();
    let mut it = v.iter();
    assert_eq!(it.len(), 24);
    it.next();
    assert_eq!(it.len(), 23);
    assert_eq!(it.count(), 23);
}

#[test]
fn iteration_of_an_empty_view() {
    let v = TensorView::from_vec(Vec::<i32>::new());
    assert!(v.is_empty());
    assert_eq!(v.iter().next(), None);

    let e = TensorView::from_vec(vec![1, 2, 3]).slice(s![2..1]);
    assert_eq!(e.iter().count(), 0);
}

#[test]
fn iterations_are_independent() {
    let v = TensorView::from_vec(vec![1, 2, 3]);
    let mut a = v.iter();
    let mut b = v.iter();
    assert_eq!(a.next().map(|(value, _)| value), Some(1));
    assert_eq!(a.next().map(|(value, _)| value), Some(2));
    // `b` starts from the beginning regardless of `a`'s progress
    assert_eq!(b.next().map(|(value, _)| value), Some(1));
    // and a fresh traversal restarts as well
    assert_equal(v.iter().map(|(value, _)| value), vec![1, 2, 3]);
}

#[test]
fn iteration_respects_slicing() {
    let v = TensorView::from_shape_vec(&[3, 4], (0..12).collect::<Vec<i32>>()).unwrap();
    let w = v.slice(s![1.., ..;2]);
    assert_equal(w.iter().map(|(value, _)| value), vec![4, 6, 8, 10]);
    // coordinates are in the sliced view's own frame
    assert_equal(
        coords_of_iter(&w),
        vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
    );
}

#[test]
fn iteration_respects_negative_steps() {
    let v = TensorView::from_vec((0..5).collect::<Vec<i32>>());
    let w = v.slice(s![..;-2]);
    assert_equal(w.iter().map(|(value, _)| value), vec![4, 2, 0]);
}

#[test]
fn iteration_of_a_transposed_view() {
    let v = TensorView::from_shape_vec(&[2, 3], (0..6).collect::<Vec<i32>>()).unwrap();
    let t = v.transpose();
    assert_equal(t.iter().map(|(value, _)| value), vec![0, 3, 1, 4, 2, 5]);
    assert_equal(
        coords_of_iter(&t),
        vec![
            vec![0, 0],
            vec![0, 1],
            vec![1, 0],
            vec![1, 1],
            vec![2, 0],
            vec![2, 1],
        ],
    );
}

#[test]
fn iteration_of_operation_and_stack_views() {
    let a = TensorView::from_vec(vec![1, 2]);
    let b = TensorView::from_vec(vec![3, 4, 5]);
    let c = a.concat(&[b], 0).unwrap();
    assert_equal(c.iter().map(|(value, _)| value), 1..=5);

    let doubled = c.elementwise(|x, _| x * 2);
    assert_equal(doubled.iter().map(|(value, _)| value), vec![2, 4, 6, 8, 10]);
}

#[test]
fn for_loop_over_a_view_reference() {
    let v = TensorView::from_vec(vec![5, 6, 7]);
    let mut seen = Vec::new();
    for (value, coords) in &v {
        seen.push((value, coords[0]));
    }
    assert_eq!(seen, vec![(5, 0), (6, 1), (7, 2)]);
}
