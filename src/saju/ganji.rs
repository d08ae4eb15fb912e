use std::fmt;

use serde::Serialize;

use super::element::Element;

pub const STEM_HANGUL: &str = "갑을병정무기경신임계";
pub const BRANCH_HANGUL: &str = "자축인묘진사오미신유술해";

/// 천간 10자. 순서가 곧 인덱스(S0..S9)다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stem {
    Gap,
    Eul,
    Byeong,
    Jeong,
    Mu,
    Gi,
    Gyeong,
    Sin,
    Im,
    Gye,
}

/// 지지 12자. 순서가 곧 인덱스(B0..B11)다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Branch {
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Stem::Gap,
        Stem::Eul,
        Stem::Byeong,
        Stem::Jeong,
        Stem::Mu,
        Stem::Gi,
        Stem::Gyeong,
        Stem::Sin,
        Stem::Im,
        Stem::Gye,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 10]
    }

    pub fn from_hangul(c: char) -> Option<Self> {
        STEM_HANGUL.chars().position(|s| s == c).map(Self::from_index)
    }

    pub fn hangul(self) -> char {
        STEM_HANGUL.chars().nth(self.index()).unwrap_or('?')
    }

    pub fn element(self) -> Element {
        match self {
            Stem::Gap | Stem::Eul => Element::Wood,
            Stem::Byeong | Stem::Jeong => Element::Fire,
            Stem::Mu | Stem::Gi => Element::Earth,
            Stem::Gyeong | Stem::Sin => Element::Metal,
            Stem::Im | Stem::Gye => Element::Water,
        }
    }
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Branch::Ja,
        Branch::Chuk,
        Branch::In,
        Branch::Myo,
        Branch::Jin,
        Branch::Sa,
        Branch::O,
        Branch::Mi,
        Branch::Sin,
        Branch::Yu,
        Branch::Sul,
        Branch::Hae,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn from_hangul(c: char) -> Option<Self> {
        BRANCH_HANGUL.chars().position(|b| b == c).map(Self::from_index)
    }

    pub fn hangul(self) -> char {
        BRANCH_HANGUL.chars().nth(self.index()).unwrap_or('?')
    }

    pub fn element(self) -> Element {
        match self {
            Branch::In | Branch::Myo => Element::Wood,
            Branch::Sa | Branch::O => Element::Fire,
            Branch::Jin | Branch::Sul | Branch::Chuk | Branch::Mi => Element::Earth,
            Branch::Sin | Branch::Yu => Element::Metal,
            Branch::Hae | Branch::Ja => Element::Water,
        }
    }
}

/// 천간 + 지지 한 쌍 (년주/월주/일주/시주).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    /// 60갑자 순번으로부터 기둥을 만든다. 0 = 갑자.
    pub fn from_cycle_index(index: i64) -> Self {
        let index = index.rem_euclid(60) as usize;
        Self::new(Stem::from_index(index), Branch::from_index(index))
    }

    /// 토큰의 앞 두 글자가 천간 + 지지 순서일 때만 기둥으로 인정한다.
    pub fn parse_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let stem = Stem::from_hangul(chars.next()?)?;
        let branch = Branch::from_hangul(chars.next()?)?;
        Some(Self::new(stem, branch))
    }

    pub fn chars(self) -> [char; 2] {
        [self.stem.hangul(), self.branch.hangul()]
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem.hangul(), self.branch.hangul())
    }
}

/// 한글 한 글자를 오행으로 분류한다. 천간/지지 어느 쪽에도 없는 글자는 `None`.
///
/// '신'은 천간(辛)과 지지(申)에 모두 등장하지만 둘 다 금(金)이므로 충돌하지 않는다.
pub fn classify_char(c: char) -> Option<Element> {
    Stem::from_hangul(c)
        .map(Stem::element)
        .or_else(|| Branch::from_hangul(c).map(Branch::element))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabets_have_expected_sizes() {
        assert_eq!(STEM_HANGUL.chars().count(), 10);
        assert_eq!(BRANCH_HANGUL.chars().count(), 12);
    }

    #[test]
    fn every_stem_and_branch_round_trips_through_hangul() {
        for stem in Stem::ALL {
            assert_eq!(Stem::from_hangul(stem.hangul()), Some(stem));
        }
        for branch in Branch::ALL {
            assert_eq!(Branch::from_hangul(branch.hangul()), Some(branch));
        }
    }

    #[test]
    fn character_table_agrees_with_typed_table() {
        for stem in Stem::ALL {
            assert_eq!(classify_char(stem.hangul()), Some(stem.element()), "stem {stem:?}");
        }
        for branch in Branch::ALL {
            assert_eq!(
                classify_char(branch.hangul()),
                Some(branch.element()),
                "branch {branch:?}",
            );
        }
    }

    #[test]
    fn element_table_matches_traditional_assignment() {
        let expected = [
            ("갑을인묘", Element::Wood),
            ("병정사오", Element::Fire),
            ("무기진술축미", Element::Earth),
            ("경신유", Element::Metal),
            ("임계해자", Element::Water),
        ];
        for (chars, element) in expected {
            for c in chars.chars() {
                assert_eq!(classify_char(c), Some(element), "char {c}");
            }
        }
    }

    #[test]
    fn each_element_owns_two_stems() {
        for element in Element::ALL {
            let stems = Stem::ALL.iter().filter(|s| s.element() == element).count();
            assert_eq!(stems, 2, "{element:?}");
        }
    }

    #[test]
    fn unknown_characters_are_unclassified() {
        assert_eq!(classify_char('년'), None);
        assert_eq!(classify_char('申'), None);
        assert_eq!(classify_char('a'), None);
    }

    #[test]
    fn cycle_index_wraps_sixty() {
        assert_eq!(Pillar::from_cycle_index(0).to_string(), "갑자");
        assert_eq!(Pillar::from_cycle_index(59).to_string(), "계해");
        assert_eq!(Pillar::from_cycle_index(60).to_string(), "갑자");
        assert_eq!(Pillar::from_cycle_index(-1).to_string(), "계해");
    }

    #[test]
    fn parse_token_requires_stem_then_branch() {
        assert_eq!(
            Pillar::parse_token("임신년"),
            Some(Pillar::new(Stem::Im, Branch::Sin)),
        );
        assert_eq!(Pillar::parse_token("자갑"), None);
        assert_eq!(Pillar::parse_token("갑"), None);
        assert_eq!(Pillar::parse_token(""), None);
    }
}
