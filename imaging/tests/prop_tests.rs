use idv_imaging::{sobel_magnitude, GrayBuffer, Mask};
use proptest::prelude::*;

fn arb_gray() -> impl Strategy<Value = GrayBuffer> {
    (1usize..40, 1usize..40).prop_flat_map(|(w, h)| {
        proptest::collection::vec(any::<u8>(), w * h)
            .prop_map(move |data| GrayBuffer::new(w, h, data).unwrap())
    })
}

fn arb_mask() -> impl Strategy<Value = Mask> {
    (1usize..30, 1usize..30).prop_flat_map(|(w, h)| {
        proptest::collection::vec(any::<bool>(), w * h).prop_map(move |bits| {
            Mask::from_fn(w, h, |x, y| bits[y * w + x])
        })
    })
}

proptest! {
    #[test]
    fn fit_within_bounds_longest_side(gray in arb_gray(), max in 1usize..50) {
        let fitted = gray.fit_within(max);
        prop_assert!(fitted.width().max(fitted.height()) <= max);
        prop_assert_eq!(fitted.as_slice().len(), fitted.width() * fitted.height());
    }

    #[test]
    fn resize_stays_within_source_range(gray in arb_gray(), w in 1usize..60, h in 1usize..60) {
        let lo = *gray.as_slice().iter().min().unwrap();
        let hi = *gray.as_slice().iter().max().unwrap();
        let resized = gray.resize(w, h);
        prop_assert!(resized.as_slice().iter().all(|&v| v >= lo && v <= hi));
    }

    #[test]
    fn flat_image_has_no_gradient(w in 1usize..30, h in 1usize..30, v in any::<u8>()) {
        let gray = GrayBuffer::new(w, h, vec![v; w * h]).unwrap();
        prop_assert!(sobel_magnitude(&gray).iter().all(|&m| m == 0));
    }

    #[test]
    fn dilation_only_adds(mask in arb_mask(), kw in 1usize..9, kh in 1usize..9) {
        let grown = mask.dilate(kw, kh);
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                prop_assert!(!mask.get(x, y) || grown.get(x, y));
            }
        }
    }

    #[test]
    fn components_partition_foreground(mask in arb_mask()) {
        let total: usize = mask.components().iter().map(|c| c.len()).sum();
        prop_assert_eq!(total, mask.count());
    }
}
