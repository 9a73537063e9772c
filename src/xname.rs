//! Physical-location identifiers ("xnames") and the hierarchy they encode.
//!
//! An xname is a cabinet token followed by zero or more component
//! segments, each a run of letters naming the component kind and a run of
//! digits giving its index. `x9c0s1b0n0` reads: cabinet 9, chassis 0,
//! slot 1, BMC 0, node 0. The grammar is
//!
//! ```text
//! xname   = cabinet segment*
//! cabinet = "x" digits
//! segment = letters digits
//! ```
//!
//! Parsing keeps the raw digit spelling of every index so that rendering
//! an [`Xname`] reproduces the input byte-for-byte, and the parent of a
//! parsed identifier is always a prefix of the original string.

use std::fmt;

use nom::{
    character::complete::{alpha1, digit1},
    combinator::all_consuming,
    multi::many1,
    sequence::pair,
    IResult,
};

use crate::error::CaptureError;

/// One (kind, index) component of an xname path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Component kind: `x` for cabinets, `c` chassis, `s` slot, `b` BMC,
    /// `n` node, `w` management switch, `j` connector port, and so on.
    pub kind: String,
    /// Raw digit spelling, preserved for round-tripping.
    pub index: String,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.index)
    }
}

/// A parsed physical-location identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xname {
    segments: Vec<Segment>,
}

fn segment(input: &str) -> IResult<&str, Segment> {
    let (rest, (kind, index)) = pair(alpha1, digit1)(input)?;
    Ok((
        rest,
        Segment {
            kind: kind.to_string(),
            index: index.to_string(),
        },
    ))
}

impl Xname {
    /// Parse an identifier into its segment path.
    ///
    /// Fails with [`CaptureError::MalformedIdentifier`] when the input is
    /// not a cabinet-rooted sequence of letter/digit segments. Callers
    /// normalizing a batch should skip the offending record and continue.
    pub fn parse(input: &str) -> Result<Self, CaptureError> {
        let malformed = |reason: &str| CaptureError::MalformedIdentifier {
            identifier: input.to_string(),
            reason: reason.to_string(),
        };

        let (_, segments) = all_consuming(many1(segment))(input)
            .map_err(|_| malformed("expected a sequence of letter/digit segments"))?;

        if segments[0].kind != "x" {
            return Err(malformed("identifier must be rooted at a cabinet token"));
        }

        Ok(Self { segments })
    }

    /// Immediate ancestor in the physical hierarchy. `None` for a bare
    /// cabinet, which sits directly under the system root.
    pub fn parent(&self) -> Option<Xname> {
        if self.segments.len() == 1 {
            return None;
        }
        Some(Xname {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Parent rendered the way the registry expects it: the empty string
    /// denotes the system root.
    pub fn parent_str(&self) -> String {
        self.parent().map(|p| p.to_string()).unwrap_or_default()
    }

    /// The cabinet this component lives in (the leading segment).
    pub fn cabinet(&self) -> Xname {
        Xname {
            segments: vec![self.segments[0].clone()],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Xname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

/// Convenience for normalizers: derive the parent identifier of a raw
/// string in one step.
pub fn parent_of(identifier: &str) -> Result<String, CaptureError> {
    Ok(Xname::parse(identifier)?.parent_str())
}
