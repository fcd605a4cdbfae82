use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use shapeshift_core::{PtrConst, PtrMut, Reflect, Shape};

use crate::options::NO_OPTIONS;
use crate::{ConversionPlan, ConvertError, FieldMappingOptions, PathSegment, PlanCompiler, trace};

#[derive(Clone, PartialEq, Eq, Hash)]
struct FacadeKey {
    src: TypeId,
    dst: TypeId,
    options: FieldMappingOptions,
}

/// Entry point for converting values.
///
/// A `Converter` owns a [`PlanCompiler`] and keeps its own map from type
/// pairs to the plans the compiler returned, so repeated calls skip the
/// compiler entirely. Most code uses the process-wide [`Converter::global`]
/// through the crate-level functions ([`convert`](crate::convert) and
/// friends); a private `Converter` is handy when a test needs fresh caches.
///
/// ```
/// use shapeshift::{Converter, record};
///
/// record! {
///     #[derive(Default)]
///     struct Wire { id: u64, name: String, score: String }
///
///     #[derive(Default)]
///     struct Row { id: i64, name: String, score: f64, dirty: bool }
/// }
///
/// let converter = Converter::new();
/// let wire = Wire { id: 7, name: "ada".into(), score: "9.5".into() };
/// let mut row = Row { dirty: true, ..Default::default() };
/// converter.convert(&wire, &mut row).unwrap();
///
/// assert_eq!((row.id, row.name.as_str(), row.score, row.dirty), (7, "ada", 9.5, true));
/// ```
pub struct Converter {
    compiler: PlanCompiler,
    plans: RwLock<HashMap<FacadeKey, Arc<ConversionPlan>>>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("plans", &self.plans.read().len())
            .field("compilations", &self.compiler.compilations())
            .finish()
    }
}

static GLOBAL: LazyLock<Converter> = LazyLock::new(Converter::new);

impl Converter {
    /// Creates a converter with empty caches.
    pub fn new() -> Self {
        Self {
            compiler: PlanCompiler::new(),
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// The converter behind the crate-level functions.
    pub fn global() -> &'static Converter {
        &GLOBAL
    }

    /// The compiler this converter delegates to on a cache miss.
    pub fn compiler(&self) -> &PlanCompiler {
        &self.compiler
    }

    /// Returns a typed handle on the plan converting `S` into `D`.
    ///
    /// Holding on to the handle skips even the cache lookup, which is useful
    /// in hot loops.
    pub fn plan<S: Reflect, D: Reflect>(
        &self,
        options: &FieldMappingOptions,
    ) -> Result<Plan<S, D>, ConvertError> {
        Ok(Plan {
            plan: self.lookup(S::SHAPE, D::SHAPE, options)?,
            _types: PhantomData,
        })
    }

    fn lookup(
        &self,
        src: &'static Shape,
        dst: &'static Shape,
        options: &FieldMappingOptions,
    ) -> Result<Arc<ConversionPlan>, ConvertError> {
        let key = FacadeKey {
            src: src.id.get(),
            dst: dst.id.get(),
            options: options.clone(),
        };
        if let Some(plan) = self.plans.read().get(&key) {
            return Ok(Arc::clone(plan));
        }

        trace!("{src} -> {dst}: not in facade cache, asking the compiler");
        // The compiler builds each pair once and hands every caller the same
        // `Arc`, so losing the race below only drops a duplicate handle.
        let plan = self.compiler.compile(src, dst, options)?;
        let mut plans = self.plans.write();
        Ok(Arc::clone(plans.entry(key).or_insert(plan)))
    }

    /// Converts `src` into `dst`, matching struct fields by name.
    pub fn convert<S: Reflect, D: Reflect>(&self, src: &S, dst: &mut D) -> Result<(), ConvertError> {
        self.plan::<S, D>(&NO_OPTIONS)?.apply(src, dst)
    }

    /// Converts `src` into `dst`, matching struct fields as `options` says.
    pub fn convert_with_options<S: Reflect, D: Reflect>(
        &self,
        src: &S,
        dst: &mut D,
        options: &FieldMappingOptions,
    ) -> Result<(), ConvertError> {
        self.plan::<S, D>(options)?.apply(src, dst)
    }

    /// Converts `src` into `dst`, then lets `callback` fill in whatever the
    /// structural conversion could not. The callback does not run if the
    /// conversion fails.
    pub fn convert_with_callback<S: Reflect, D: Reflect>(
        &self,
        src: &S,
        dst: &mut D,
        callback: impl FnOnce(&S, &mut D),
    ) -> Result<(), ConvertError> {
        self.convert_with_options_and_callback(src, dst, &NO_OPTIONS, callback)
    }

    /// [`Converter::convert_with_callback`], matching struct fields as
    /// `options` says.
    pub fn convert_with_options_and_callback<S: Reflect, D: Reflect>(
        &self,
        src: &S,
        dst: &mut D,
        options: &FieldMappingOptions,
        callback: impl FnOnce(&S, &mut D),
    ) -> Result<(), ConvertError> {
        self.convert_with_options(src, dst, options)?;
        callback(src, dst);
        Ok(())
    }

    /// Converts `src` into `dst` when both are present; does nothing otherwise.
    pub fn convert_optional<S: Reflect, D: Reflect>(
        &self,
        src: Option<&S>,
        dst: Option<&mut D>,
    ) -> Result<(), ConvertError> {
        match (src, dst) {
            (Some(src), Some(dst)) => self.convert(src, dst),
            _ => Ok(()),
        }
    }

    /// Converts a new `D` out of `src`.
    pub fn convert_to<S: Reflect, D: Reflect + Default>(&self, src: &S) -> Result<D, ConvertError> {
        let mut dst = D::default();
        self.convert(src, &mut dst)?;
        Ok(dst)
    }

    /// Converts each `srcs[i]` into `dsts[i]`, compiling the plan once.
    ///
    /// Both slices must have the same length. Stops at the first failure;
    /// earlier items stay converted.
    pub fn convert_slice<S: Reflect, D: Reflect>(&self, srcs: &[S], dsts: &mut [D]) -> Result<(), ConvertError> {
        self.convert_each(srcs, dsts, &NO_OPTIONS, |_, _| {})
    }

    /// [`Converter::convert_slice`], matching struct fields as `options` says.
    pub fn convert_slice_with_options<S: Reflect, D: Reflect>(
        &self,
        srcs: &[S],
        dsts: &mut [D],
        options: &FieldMappingOptions,
    ) -> Result<(), ConvertError> {
        self.convert_each(srcs, dsts, options, |_, _| {})
    }

    /// Converts `srcs` into `dsts` item by item.
    ///
    /// An empty `dsts` is first filled with `srcs.len()` default values;
    /// otherwise the lengths must match.
    ///
    /// ```
    /// use shapeshift::Converter;
    ///
    /// let mut out: Vec<String> = Vec::new();
    /// Converter::new().convert_array(&[1u8, 2, 3], &mut out).unwrap();
    /// assert_eq!(out, ["1", "2", "3"]);
    /// ```
    pub fn convert_array<S: Reflect, D: Reflect + Default>(
        &self,
        srcs: &[S],
        dsts: &mut Vec<D>,
    ) -> Result<(), ConvertError> {
        self.convert_array_with_options_and_callback(srcs, dsts, &NO_OPTIONS, |_, _| {})
    }

    /// [`Converter::convert_array`], matching struct fields as `options` says.
    pub fn convert_array_with_options<S: Reflect, D: Reflect + Default>(
        &self,
        srcs: &[S],
        dsts: &mut Vec<D>,
        options: &FieldMappingOptions,
    ) -> Result<(), ConvertError> {
        self.convert_array_with_options_and_callback(srcs, dsts, options, |_, _| {})
    }

    /// [`Converter::convert_array`], calling `callback` on each pair right
    /// after it is converted.
    pub fn convert_array_with_callback<S: Reflect, D: Reflect + Default>(
        &self,
        srcs: &[S],
        dsts: &mut Vec<D>,
        callback: impl FnMut(&S, &mut D),
    ) -> Result<(), ConvertError> {
        self.convert_array_with_options_and_callback(srcs, dsts, &NO_OPTIONS, callback)
    }

    /// [`Converter::convert_array_with_callback`], matching struct fields as
    /// `options` says.
    pub fn convert_array_with_options_and_callback<S: Reflect, D: Reflect + Default>(
        &self,
        srcs: &[S],
        dsts: &mut Vec<D>,
        options: &FieldMappingOptions,
        callback: impl FnMut(&S, &mut D),
    ) -> Result<(), ConvertError> {
        if dsts.is_empty() {
            dsts.resize_with(srcs.len(), D::default);
        }
        self.convert_each(srcs, dsts, options, callback)
    }

    fn convert_each<S: Reflect, D: Reflect>(
        &self,
        srcs: &[S],
        dsts: &mut [D],
        options: &FieldMappingOptions,
        mut callback: impl FnMut(&S, &mut D),
    ) -> Result<(), ConvertError> {
        if srcs.len() != dsts.len() {
            return Err(ConvertError::ArityMismatch {
                src_len: srcs.len(),
                dst_len: dsts.len(),
            });
        }
        let plan = self.plan::<S, D>(options)?;
        for (index, (src, dst)) in srcs.iter().zip(dsts.iter_mut()).enumerate() {
            plan.apply(src, dst)
                .map_err(|err| err.at(PathSegment::Index(index)))?;
            callback(src, dst);
        }
        Ok(())
    }
}

/// A compiled plan for converting an `S` into a `D`.
///
/// ```
/// use shapeshift::{Converter, FieldMappingOptions};
///
/// let plan = Converter::global()
///     .plan::<Vec<i32>, Vec<i64>>(&FieldMappingOptions::new())
///     .unwrap();
/// let mut out = Vec::new();
/// for batch in [vec![1, 2], vec![3]] {
///     plan.apply(&batch, &mut out).unwrap();
/// }
/// assert_eq!(out, [3]);
/// ```
pub struct Plan<S, D> {
    plan: Arc<ConversionPlan>,
    _types: PhantomData<fn(&S, &mut D)>,
}

impl<S, D> Clone for Plan<S, D> {
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
            _types: PhantomData,
        }
    }
}

impl<S, D> fmt::Debug for Plan<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.plan, f)
    }
}

impl<S: Reflect, D: Reflect> Plan<S, D> {
    /// Converts `src` into `dst`.
    pub fn apply(&self, src: &S, dst: &mut D) -> Result<(), ConvertError> {
        // compiled for exactly `S::SHAPE` and `D::SHAPE`
        unsafe { self.plan.execute(PtrConst::new(src), PtrMut::new(dst)) }
    }

    /// The untyped plan.
    pub fn conversion_plan(&self) -> &Arc<ConversionPlan> {
        &self.plan
    }
}
