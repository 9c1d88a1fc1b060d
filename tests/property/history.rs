//! History stays bounded and newest-first for any sequence of batches

use proptest::prelude::*;
use stylemix::project::{History, HISTORY_LIMIT};
use stylemix::types::{GeneratedImage, ImageId, ImagePayload};

fn batch(n: usize) -> Vec<GeneratedImage> {
    (0..n)
        .map(|_| {
            GeneratedImage::new(ImagePayload {
                data: "iVBORw0KGgo=".to_string(),
                media_type: "image/png".to_string(),
            })
        })
        .collect()
}

proptest! {
    #[test]
    fn history_is_bounded_and_newest_first(sizes in prop::collection::vec(1usize..=4, 0..15)) {
        let mut history = History::new();
        let mut expected: Vec<ImageId> = Vec::new();

        for size in sizes {
            let images = batch(size);
            let mut ids: Vec<ImageId> = images.iter().map(|image| image.id.clone()).collect();
            ids.extend(expected);
            expected = ids;
            history.prepend(images);
        }
        expected.truncate(HISTORY_LIMIT);

        prop_assert!(history.len() <= HISTORY_LIMIT);
        let actual: Vec<ImageId> = history.entries().iter().map(|image| image.id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }
}
