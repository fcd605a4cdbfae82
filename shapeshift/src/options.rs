use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use shapeshift_core::{PtrConst, PtrMut, Reflect, Shape};

/// How destination struct fields are matched to source struct fields.
///
/// Options are immutable values: the builder methods consume `self` and
/// return a new set. Two option sets built separately compare equal (and share
/// compiled plans) when they exclude, rename and override the same fields.
///
/// Options apply to the first struct pair reached from the converted types
/// (looking through lists, maps, `Option` and `Box`). Structs nested in that
/// struct's fields are converted with default options.
///
/// ```
/// use shapeshift::FieldMappingOptions;
///
/// let a = FieldMappingOptions::new().exclude("password").rename("login", "email");
/// let b = FieldMappingOptions::new().rename("login", "email").exclude("password");
/// assert_eq!(a, b);
/// assert!(a.is_excluded("password"));
/// assert_eq!(a.source_name("login"), "email");
/// assert_eq!(a.source_name("id"), "id");
/// ```
#[derive(Clone, Default)]
pub struct FieldMappingOptions {
    // `None` is the empty policy, so the default options never allocate.
    inner: Option<Arc<OptionsInner>>,
}

#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
struct OptionsInner {
    excluded: BTreeSet<String>,
    /// destination name -> source name
    renames: BTreeMap<String, String>,
    overrides: BTreeMap<String, FieldOverride>,
}

static EMPTY: OptionsInner = OptionsInner {
    excluded: BTreeSet::new(),
    renames: BTreeMap::new(),
    overrides: BTreeMap::new(),
};

/// The default options, usable where a `&'static` is needed.
pub(crate) static NO_OPTIONS: FieldMappingOptions = FieldMappingOptions::new();

impl FieldMappingOptions {
    /// Options that match every field by its own name.
    pub const fn new() -> Self {
        Self { inner: None }
    }

    /// Leaves the destination field `field` untouched.
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.inner_mut().excluded.insert(field.into());
        self
    }

    /// Fills the destination field `dst` from the source field `src`.
    pub fn rename(mut self, dst: impl Into<String>, src: impl Into<String>) -> Self {
        self.inner_mut().renames.insert(dst.into(), src.into());
        self
    }

    /// Fills the destination field `field` by calling `f` with the matching
    /// source field, instead of converting it structurally.
    ///
    /// `S` and `D` must be the exact types of the source and destination
    /// fields; this is checked when the plan is compiled.
    ///
    /// ```
    /// use shapeshift::FieldMappingOptions;
    ///
    /// fn cents(src: &f64, dst: &mut u64) {
    ///     *dst = (src * 100.0).round() as u64;
    /// }
    ///
    /// let options = FieldMappingOptions::new().override_field("price", cents);
    /// assert!(options.override_for("price").is_some());
    /// ```
    pub fn override_field<S: Reflect, D: Reflect>(
        mut self,
        field: impl Into<String>,
        f: fn(&S, &mut D),
    ) -> Self {
        self.inner_mut()
            .overrides
            .insert(field.into(), FieldOverride::new(f));
        self
    }

    /// Returns true if the destination field `field` is excluded.
    pub fn is_excluded(&self, field: &str) -> bool {
        self.inner().excluded.contains(field)
    }

    /// Returns the name of the source field that fills the destination field
    /// `field`.
    pub fn source_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.inner()
            .renames
            .get(field)
            .map(String::as_str)
            .unwrap_or(field)
    }

    /// Returns the override registered for the destination field `field`.
    pub fn override_for(&self, field: &str) -> Option<&FieldOverride> {
        self.inner().overrides.get(field)
    }

    /// Returns true if no field is excluded, renamed or overridden.
    pub fn is_empty(&self) -> bool {
        self.inner() == &EMPTY
    }

    fn inner(&self) -> &OptionsInner {
        self.inner.as_deref().unwrap_or(&EMPTY)
    }

    fn inner_mut(&mut self) -> &mut OptionsInner {
        Arc::make_mut(self.inner.get_or_insert_with(Default::default))
    }
}

impl PartialEq for FieldMappingOptions {
    fn eq(&self, other: &Self) -> bool {
        self.inner() == other.inner()
    }
}

impl Eq for FieldMappingOptions {}

impl Hash for FieldMappingOptions {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner().hash(state);
    }
}

impl fmt::Debug for FieldMappingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner();
        f.debug_struct("FieldMappingOptions")
            .field("excluded", &inner.excluded)
            .field("renames", &inner.renames)
            .field("overrides", &inner.overrides)
            .finish()
    }
}

/// A user function standing in for the structural conversion of one field.
///
/// Two overrides are equal when they wrap the same function for the same
/// field types.
#[derive(Clone)]
pub struct FieldOverride {
    src: &'static Shape,
    dst: &'static Shape,
    addr: usize,
    call: Arc<dyn Fn(PtrConst<'_>, PtrMut<'_>) + Send + Sync>,
}

impl FieldOverride {
    fn new<S: Reflect, D: Reflect>(f: fn(&S, &mut D)) -> Self {
        FieldOverride {
            src: S::SHAPE,
            dst: D::SHAPE,
            addr: f as usize,
            // SAFETY: only reachable through `FieldOverride::call`, whose
            // caller guarantees the pointee types.
            call: Arc::new(move |src, dst| f(unsafe { src.get::<S>() }, unsafe { dst.as_mut::<D>() })),
        }
    }

    /// Shape of the source field type the function takes.
    pub fn source_shape(&self) -> &'static Shape {
        self.src
    }

    /// Shape of the destination field type the function fills.
    pub fn destination_shape(&self) -> &'static Shape {
        self.dst
    }

    /// # Safety
    ///
    /// `src` must point to a value of [`Self::source_shape`] and `dst` to a
    /// value of [`Self::destination_shape`].
    pub(crate) unsafe fn call(&self, src: PtrConst<'_>, dst: PtrMut<'_>) {
        (self.call)(src, dst)
    }
}

impl PartialEq for FieldOverride {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src && self.dst == other.dst && self.addr == other.addr
    }
}

impl Eq for FieldOverride {}

impl Hash for FieldOverride {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.src.hash(state);
        self.dst.hash(state);
        self.addr.hash(state);
    }
}

impl fmt::Debug for FieldOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(&{}, &mut {}) @ {:#x}", self.src, self.dst, self.addr)
    }
}
