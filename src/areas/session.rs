use crate::areas::package::Package;
use std::cell::{RefCell, RefMut};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotId {
    First,
    Second,
}

/// The packages a user is working with, at most one per slot
pub struct Session {
    writer: RefCell<Box<dyn Write>>,
    first: Option<Package>,
    second: Option<Package>,
}

impl Session {
    pub fn new(writer: Box<dyn Write>) -> Self {
        Session {
            writer: RefCell::new(writer),
            first: None,
            second: None,
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    /// Place `package` in `slot`, returning whatever it replaced
    pub fn load(&mut self, slot: SlotId, package: Package) -> Option<Package> {
        tracing::debug!(?slot, package = package.name(), "loading package");
        self.slot_mut(slot).replace(package)
    }

    /// Fill the first empty slot; with both full, the first is replaced
    pub fn load_next(&mut self, package: Package) -> SlotId {
        let slot = match (&self.first, &self.second) {
            (None, _) => SlotId::First,
            (Some(_), None) => SlotId::Second,
            (Some(_), Some(_)) => SlotId::First,
        };
        self.load(slot, package);
        slot
    }

    pub fn remove(&mut self, slot: SlotId) -> Option<Package> {
        self.slot_mut(slot).take()
    }

    pub fn clear(&mut self) {
        self.first = None;
        self.second = None;
    }

    pub fn package(&self, slot: SlotId) -> Option<&Package> {
        match slot {
            SlotId::First => self.first.as_ref(),
            SlotId::Second => self.second.as_ref(),
        }
    }

    /// Both packages, when both slots are filled
    pub fn pair(&self) -> Option<(&Package, &Package)> {
        self.first.as_ref().zip(self.second.as_ref())
    }

    pub fn is_comparable(&self) -> bool {
        self.pair().is_some()
    }

    /// Header line for whatever the session currently holds
    pub fn summary(&self) -> Option<String> {
        match (&self.first, &self.second) {
            (Some(first), Some(second)) => {
                Some(format!("Comparing {} vs {}", first.name(), second.name()))
            }
            (Some(only), None) | (None, Some(only)) => Some(only.summary()),
            (None, None) => None,
        }
    }

    fn slot_mut(&mut self, slot: SlotId) -> &mut Option<Package> {
        match slot {
            SlotId::First => &mut self.first,
            SlotId::Second => &mut self.second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::BTreeMap;

    fn package(name: &str, parts: usize) -> Package {
        let parts = (0..parts)
            .map(|n| (format!("part{n}.xml"), "<a/>".to_string()))
            .collect::<BTreeMap<_, _>>();
        Package::new(name, parts)
    }

    #[fixture]
    fn session() -> Session {
        Session::new(Box::new(std::io::sink()))
    }

    fn names(session: &Session) -> (Option<&str>, Option<&str>) {
        (
            session.package(SlotId::First).map(Package::name),
            session.package(SlotId::Second).map(Package::name),
        )
    }

    #[rstest]
    fn load_next_fills_then_replaces_first(mut session: Session) {
        assert_eq!(session.load_next(package("a.docx", 1)), SlotId::First);
        assert_eq!(session.load_next(package("b.docx", 1)), SlotId::Second);
        assert_eq!(session.load_next(package("c.docx", 1)), SlotId::First);

        assert_eq!(names(&session), (Some("c.docx"), Some("b.docx")));
    }

    #[rstest]
    fn load_next_reuses_an_emptied_first_slot(mut session: Session) {
        session.load(SlotId::Second, package("b.docx", 1));

        assert_eq!(session.load_next(package("a.docx", 1)), SlotId::First);
        assert!(session.is_comparable());
    }

    #[rstest]
    fn load_replaces_and_returns_previous(mut session: Session) {
        assert_eq!(session.load(SlotId::Second, package("old.xlsx", 1)), None);

        let replaced = session.load(SlotId::Second, package("new.xlsx", 1));

        assert_eq!(replaced.as_ref().map(Package::name), Some("old.xlsx"));
        assert_eq!(names(&session), (None, Some("new.xlsx")));
    }

    #[rstest]
    fn remove_and_clear(mut session: Session) {
        session.load(SlotId::First, package("a.pptx", 1));
        session.load(SlotId::Second, package("b.pptx", 1));

        assert_eq!(session.remove(SlotId::First).map(|p| p.name().to_string()), Some("a.pptx".to_string()));
        assert!(!session.is_comparable());

        session.clear();
        assert_eq!(names(&session), (None, None));
        assert_eq!(session.summary(), None);
    }

    #[rstest]
    fn summaries(mut session: Session) {
        session.load(SlotId::First, package("a.docx", 3));
        assert_eq!(session.summary().as_deref(), Some("a.docx (3 XML parts)"));

        session.load(SlotId::Second, package("b.docx", 2));
        assert_eq!(session.summary().as_deref(), Some("Comparing a.docx vs b.docx"));

        let (first, second) = session.pair().unwrap();
        assert_eq!((first.part_count(), second.part_count()), (3, 2));
    }
}
