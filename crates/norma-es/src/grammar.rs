// Named grammar wrapper: a compiled class transducer plus its metadata.

use norma_fst::Fst;

/// Direction a grammar runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarKind {
    /// Surface text in, tagged annotation out.
    Classify,
    /// Tagged annotation in, surface text out.
    Verbalize,
}

/// A named, composed transducer. Built once, immutable thereafter;
/// rebuilding a grammar means constructing a new one.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    kind: GrammarKind,
    deterministic: bool,
    fst: Fst,
}

impl Grammar {
    /// Wrap a class body with the annotation-token framing
    /// (`name { ... }`), optimize it and record its metadata.
    pub fn build(name: &str, kind: GrammarKind, body: Fst) -> Grammar {
        let framed = Fst::insert(&format!("{name} {{ "))
            .concat(body)
            .concat(Fst::insert(" }"))
            .optimize();
        let deterministic = framed.is_deterministic();
        Grammar {
            name: name.to_string(),
            kind,
            deterministic,
            fst: framed,
        }
    }

    /// The same grammar running in the opposite direction: tapes swapped,
    /// kind flipped, weights preserved.
    pub fn inverted(&self) -> Grammar {
        let fst = self.fst.clone().invert();
        Grammar {
            name: self.name.clone(),
            kind: match self.kind {
                GrammarKind::Classify => GrammarKind::Verbalize,
                GrammarKind::Verbalize => GrammarKind::Classify,
            },
            deterministic: fst.is_deterministic(),
            fst,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GrammarKind {
        self.kind
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    pub fn fst(&self) -> &Fst {
        &self.fst
    }
}
