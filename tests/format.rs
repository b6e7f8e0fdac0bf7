use tensorview::TensorView;

#[test]
fn one_dimensional_views_are_space_joined() {
    let v = TensorView::from_vec(vec![1, 2, 3]);
    assert_eq!(v.to_text(None), "1 2 3");
    assert_eq!(format!("{}", v), "1 2 3");
}

#[test]
fn two_dimensional_views_are_line_separated() {
    let v = TensorView::from_shape_vec(&[2, 3], (1..=6).collect::<Vec<i32>>()).unwrap();
    assert_eq!(v.to_text(None), "1 2 3\n4 5 6");
}

#[test]
fn columns_are_right_aligned_to_the_widest_element() {
    let v = TensorView::from_shape_vec(&[2, 2], vec![1, 10, 2, 100]).unwrap();
    assert_eq!(v.to_text(None), "  1  10\n  2 100");
}

#[test]
fn leading_axes_become_dashed_blocks() {
    let v = TensorView::from_shape_vec(&[2, 2, 2], (0..8).collect::<Vec<i32>>()).unwrap();
    assert_eq!(v.to_text(None), "0 1\n2 3\n-\n4 5\n6 7");
}

#[test]
fn empty_views_render_as_nothing() {
    let v = TensorView::from_shape_vec(&[0, 3], Vec::<i32>::new()).unwrap();
    assert_eq!(v.to_text(None), "");
    assert_eq!(TensorView::<i32>::from_vec(vec![]).to_text(None), "");
}

#[test]
fn display_follows_the_view_not_the_buffer() {
    use tensorview::s;
    let v = TensorView::from_shape_vec(&[3, 4], (0..12).collect::<Vec<i32>>()).unwrap();
    let w = v.slice(s![1.., ..;2]).transpose();
    assert_eq!(w.to_text(None), " 4  8\n 6 10");
}

#[test]
fn long_rows_elide_their_middle() {
    let v = TensorView::from_vec((0..10).collect::<Vec<i32>>());
    assert_eq!(v.to_text(Some(4)), "0 1 2 3 .. 7 8 9");
    // wide enough: no elision
    assert_eq!(v.to_text(Some(10)), "0 1 2 3 4 5 6 7 8 9");
}

#[test]
fn wide_grids_elide_columns() {
    let v = TensorView::from_shape_vec(&[2, 10], (0..20).collect::<Vec<i32>>()).unwrap();
    assert_eq!(v.to_text(Some(4)), " 0  1 ..  8  9\n10 11 .. 18 19");
}

#[test]
fn tall_grids_elide_rows() {
    let v = TensorView::from_shape_vec(&[10, 2], (0..20).collect::<Vec<i32>>()).unwrap();
    assert_eq!(v.to_text(Some(4)), " 0  1\n 2  3\n :  :\n16 17\n18 19");
}

#[test]
fn oversized_leading_axes_elide_whole_blocks() {
    let v = TensorView::from_shape_vec(&[5, 2, 3], (0..30).collect::<Vec<i32>>()).unwrap();
    assert_eq!(
        v.to_text(Some(3)),
        " 0  1  2\n 3  4  5\n-\n : ..  :\n-\n24 25 26\n27 28 29"
    );
}

#[test]
fn debug_shows_metadata_only() {
    let v = TensorView::from_shape_vec(&[2, 3], (0..6).collect::<Vec<i32>>()).unwrap();
    let dbg = format!("{:?}", v);
    assert!(dbg.starts_with("TensorView(dense)"), "{}", dbg);
    assert!(dbg.contains("size=[2, 3]"), "{}", dbg);
    let t = v.transpose();
    assert!(format!("{:?}", t).contains("transposed=true"));
}
