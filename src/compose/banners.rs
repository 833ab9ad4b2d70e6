use crate::compose::sections::ContentSection;
use crate::models::asset::BannerAd;

pub const DEFAULT_BANNER_INTERVAL: usize = 2;

/// A banner inserted directly after the section at 1-based `after_position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerSlot {
    pub after_position: usize,
    pub banner_index: usize,
}

/// Every `interval`-th section is followed by the next unused banner until the
/// banners run out. Banners are never repeated. An interval of 0 places nothing.
pub fn place_banners(sections: &[ContentSection], banners: &[BannerAd], interval: usize) -> Vec<BannerSlot> {
    if interval == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut banner_index = 0;
    for position in 1..=sections.len() {
        if banner_index >= banners.len() {
            break;
        }
        if position % interval == 0 {
            slots.push(BannerSlot {
                after_position: position,
                banner_index,
            });
            banner_index += 1;
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::sections::{compose_sections, HeadingLevel, SectionInput};

    fn sections(n: usize) -> Vec<ContentSection> {
        let inputs: Vec<SectionInput> = (0..n)
            .map(|i| SectionInput {
                keyword: format!("k{}", i),
                generated_text: String::new(),
                heading_level: HeadingLevel::H2,
            })
            .collect();
        compose_sections(&inputs)
    }

    fn banners(n: usize) -> Vec<BannerAd> {
        (0..n)
            .map(|i| BannerAd {
                title: format!("Banner {}", i),
                description: String::new(),
                cta: String::new(),
                cta_url: None,
                image: None,
            })
            .collect()
    }

    #[test]
    fn single_banner_after_second_section() {
        let slots = place_banners(&sections(7), &banners(1), 2);
        assert_eq!(slots, vec![BannerSlot { after_position: 2, banner_index: 0 }]);
    }

    #[test]
    fn banners_fill_every_interval() {
        let slots = place_banners(&sections(7), &banners(5), 2);
        let after: Vec<usize> = slots.iter().map(|s| s.after_position).collect();
        assert_eq!(after, vec![2, 4, 6]);
        let used: Vec<usize> = slots.iter().map(|s| s.banner_index).collect();
        assert_eq!(used, vec![0, 1, 2]);
    }

    #[test]
    fn insertion_count_bounded() {
        for count in 0..10 {
            for pool in 0..5 {
                for interval in 1..4 {
                    let slots = place_banners(&sections(count), &banners(pool), interval);
                    assert!(slots.len() <= pool.min(count / interval));
                }
            }
        }
    }

    #[test]
    fn no_banners_or_zero_interval() {
        assert!(place_banners(&sections(6), &[], 2).is_empty());
        assert!(place_banners(&sections(6), &banners(3), 0).is_empty());
    }

    #[test]
    fn custom_interval() {
        let slots = place_banners(&sections(9), &banners(2), 3);
        let after: Vec<usize> = slots.iter().map(|s| s.after_position).collect();
        assert_eq!(after, vec![3, 6]);
    }
}
