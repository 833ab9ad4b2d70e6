use log::debug;

use crate::compose::sections::{ContentSection, HeadingLevel};
use crate::compose::Warning;
use crate::models::asset::{is_valid_image_url, ImageAsset, ImageKind};

/// Result of mapping the content image pool onto sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAssignment {
    /// Pool index per section (same indexing as the sections); `None` keeps the placeholder.
    pub slots: Vec<Option<usize>>,
    pub h2_count: usize,
    pub excess_count: usize,
}

/// Content images eligible for assignment, ordered by `sort_order`.
/// Images with unusable URLs are dropped with a warning.
pub fn content_pool<'a>(images: &'a [ImageAsset], warnings: &mut Vec<Warning>) -> Vec<&'a ImageAsset> {
    let mut pool: Vec<&ImageAsset> = images
        .iter()
        .filter(|img| img.kind == ImageKind::Content)
        .filter(|img| {
            if is_valid_image_url(&img.url) {
                true
            } else {
                debug!("skipping content image with invalid url {:?}", img.url);
                warnings.push(Warning::InvalidImageUrl {
                    slot: "content".to_string(),
                    url: img.url.clone(),
                });
                false
            }
        })
        .collect();
    // stable: equal sort orders keep their stored order
    pool.sort_by_key(|img| img.sort_order);
    pool
}

/// Cyclic assignment: the k-th section carrying an image placeholder receives
/// `pool[k % pool_len]`. With an empty pool every placeholder stays in place.
pub fn assign_images(sections: &[ContentSection], pool_len: usize) -> ImageAssignment {
    let mut next = 0usize;
    let slots = sections
        .iter()
        .map(|section| {
            if !section.image_placeholder || pool_len == 0 {
                return None;
            }
            let index = next % pool_len;
            next += 1;
            Some(index)
        })
        .collect();

    let h2_count = sections
        .iter()
        .filter(|s| s.heading_level == HeadingLevel::H2)
        .count();

    ImageAssignment {
        slots,
        h2_count,
        excess_count: pool_len.saturating_sub(h2_count),
    }
}

/// Warnings for an assignment: surplus images and placeholders left unfilled.
pub fn assignment_warnings(assignment: &ImageAssignment, pool_len: usize, warnings: &mut Vec<Warning>) {
    if assignment.excess_count > 0 {
        warnings.push(Warning::ExcessImages {
            image_count: pool_len,
            h2_count: assignment.h2_count,
            excess: assignment.excess_count,
        });
    }
    if pool_len == 0 && assignment.h2_count > 0 {
        warnings.push(Warning::NoContentImages {
            placeholders: assignment.h2_count,
        });
    }
}
