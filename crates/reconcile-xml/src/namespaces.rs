#![allow(non_snake_case)]
//! Namespace-qualified accessors for the WordprocessingML tags this engine
//! reads or writes. Grouped the way the schema groups them, not the way any
//! one component happens to use them.

use crate::xname::XName;

pub mod W {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    pub fn document() -> XName {
        XName::new(NS, "document")
    }
    pub fn body() -> XName {
        XName::new(NS, "body")
    }
    pub fn p() -> XName {
        XName::new(NS, "p")
    }
    pub fn pPr() -> XName {
        XName::new(NS, "pPr")
    }
    pub fn pPrChange() -> XName {
        XName::new(NS, "pPrChange")
    }
    pub fn r() -> XName {
        XName::new(NS, "r")
    }
    pub fn rPr() -> XName {
        XName::new(NS, "rPr")
    }
    pub fn rPrChange() -> XName {
        XName::new(NS, "rPrChange")
    }
    pub fn t() -> XName {
        XName::new(NS, "t")
    }
    pub fn delText() -> XName {
        XName::new(NS, "delText")
    }
    pub fn tab() -> XName {
        XName::new(NS, "tab")
    }
    pub fn br() -> XName {
        XName::new(NS, "br")
    }
    pub fn cr() -> XName {
        XName::new(NS, "cr")
    }
    pub fn noBreakHyphen() -> XName {
        XName::new(NS, "noBreakHyphen")
    }
    pub fn ins() -> XName {
        XName::new(NS, "ins")
    }
    pub fn del() -> XName {
        XName::new(NS, "del")
    }
    pub fn id() -> XName {
        XName::new(NS, "id")
    }
    pub fn author() -> XName {
        XName::new(NS, "author")
    }
    pub fn date() -> XName {
        XName::new(NS, "date")
    }
    pub fn val() -> XName {
        XName::new(NS, "val")
    }

    // Run formatting properties, in canonical rPr schema order.
    pub fn rStyle() -> XName {
        XName::new(NS, "rStyle")
    }
    pub fn rFonts() -> XName {
        XName::new(NS, "rFonts")
    }
    pub fn b() -> XName {
        XName::new(NS, "b")
    }
    pub fn bCs() -> XName {
        XName::new(NS, "bCs")
    }
    pub fn i() -> XName {
        XName::new(NS, "i")
    }
    pub fn iCs() -> XName {
        XName::new(NS, "iCs")
    }
    pub fn caps() -> XName {
        XName::new(NS, "caps")
    }
    pub fn smallCaps() -> XName {
        XName::new(NS, "smallCaps")
    }
    pub fn strike() -> XName {
        XName::new(NS, "strike")
    }
    pub fn u() -> XName {
        XName::new(NS, "u")
    }

    // Tables.
    pub fn tbl() -> XName {
        XName::new(NS, "tbl")
    }
    pub fn tblPr() -> XName {
        XName::new(NS, "tblPr")
    }
    pub fn tblGrid() -> XName {
        XName::new(NS, "tblGrid")
    }
    pub fn gridCol() -> XName {
        XName::new(NS, "gridCol")
    }
    pub fn tr() -> XName {
        XName::new(NS, "tr")
    }
    pub fn trPr() -> XName {
        XName::new(NS, "trPr")
    }
    pub fn tc() -> XName {
        XName::new(NS, "tc")
    }
    pub fn tcPr() -> XName {
        XName::new(NS, "tcPr")
    }
    pub fn gridSpan() -> XName {
        XName::new(NS, "gridSpan")
    }
    pub fn vMerge() -> XName {
        XName::new(NS, "vMerge")
    }

    // Lists.
    pub fn numPr() -> XName {
        XName::new(NS, "numPr")
    }
    pub fn ilvl() -> XName {
        XName::new(NS, "ilvl")
    }
    pub fn numId() -> XName {
        XName::new(NS, "numId")
    }

    // Pass-through / sentinel-bearing containers.
    pub fn bookmarkStart() -> XName {
        XName::new(NS, "bookmarkStart")
    }
    pub fn bookmarkEnd() -> XName {
        XName::new(NS, "bookmarkEnd")
    }
    pub fn hyperlink() -> XName {
        XName::new(NS, "hyperlink")
    }
    pub fn sdt() -> XName {
        XName::new(NS, "sdt")
    }
    pub fn sdtContent() -> XName {
        XName::new(NS, "sdtContent")
    }
    pub fn smartTag() -> XName {
        XName::new(NS, "smartTag")
    }
    pub fn fldSimple() -> XName {
        XName::new(NS, "fldSimple")
    }
    pub fn fldChar() -> XName {
        XName::new(NS, "fldChar")
    }
    pub fn instrText() -> XName {
        XName::new(NS, "instrText")
    }
    pub fn drawing() -> XName {
        XName::new(NS, "drawing")
    }
    pub fn pict() -> XName {
        XName::new(NS, "pict")
    }
    pub fn footnoteReference() -> XName {
        XName::new(NS, "footnoteReference")
    }
    pub fn endnoteReference() -> XName {
        XName::new(NS, "endnoteReference")
    }
    pub fn commentRangeStart() -> XName {
        XName::new(NS, "commentRangeStart")
    }
    pub fn commentRangeEnd() -> XName {
        XName::new(NS, "commentRangeEnd")
    }
    pub fn commentReference() -> XName {
        XName::new(NS, "commentReference")
    }
    pub fn proofErr() -> XName {
        XName::new(NS, "proofErr")
    }
    pub fn oMath() -> XName {
        XName::new(NS, "oMath")
    }
}

pub mod W14 {
    use super::XName;
    pub const NS: &str =
        "http://schemas.microsoft.com/office/word/2010/wordml";

    pub fn paraId() -> XName {
        XName::new(NS, "paraId")
    }
}

pub mod XML {
    pub const NS: &str = "http://www.w3.org/XML/1998/namespace";
    pub const SPACE_ATTR: &str = "xml:space";
    pub const PRESERVE: &str = "preserve";
}

/// The `insertOoxml`-style package envelope: a flat `pkg:package` of
/// `pkg:part`s, each wrapping its content in `pkg:xmlData`. The engine only
/// ever sees this shape as a whole-package input/output form (§6 "the
/// engine accepts (a) a whole package container").
pub mod PKG {
    use super::XName;
    pub const NS: &str = "http://schemas.microsoft.com/office/2006/xmlPackage";

    pub fn package() -> XName {
        XName::new(NS, "package")
    }
    pub fn part() -> XName {
        XName::new(NS, "part")
    }
    pub fn xmlData() -> XName {
        XName::new(NS, "xmlData")
    }
}

pub const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const NUMBERING_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";

pub mod R {
    use super::XName;
    pub const NS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    pub fn id() -> XName {
        XName::new(NS, "id")
    }
}

/// Canonical `w:rPr` child order, used everywhere a new run-properties
/// element is synthesized (C5). Anything not listed sorts after everything
/// listed, in first-seen order, so unrecognized/extension children never get
/// dropped, only pushed to the end.
pub const RPR_SCHEMA_ORDER: &[&str] = &[
    "rStyle",
    "rFonts",
    "b",
    "bCs",
    "i",
    "iCs",
    "caps",
    "smallCaps",
    "strike",
    "dstrike",
    "outline",
    "shadow",
    "emboss",
    "imprint",
    "noProof",
    "snapToGrid",
    "vanish",
    "webHidden",
    "color",
    "spacing",
    "w",
    "kern",
    "position",
    "sz",
    "szCs",
    "highlight",
    "u",
    "effect",
    "bdr",
    "shd",
    "fitText",
    "vertAlign",
    "rtl",
    "cs",
    "em",
    "lang",
    "eastAsianLayout",
    "specVanish",
    "oMath",
    "rPrChange",
];
