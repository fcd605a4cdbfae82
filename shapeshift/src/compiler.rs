//! Plan compiler and its cache.
//!
//! Plans are cached per type pair: the two type ids plus the field mapping
//! options, compared by value. Failures are cached too, so a type pair that
//! cannot be converted is only inspected once.

use core::any::TypeId;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use shapeshift_core::{Def, Shape};

use crate::coerce::Coercion;
use crate::options::NO_OPTIONS;
use crate::plan::{ConversionPlan, PlanRef, Step, indirect, map, record, sequence};
use crate::{ConvertError, FieldMappingOptions, MismatchReason, debug, trace};

/// Identity of a compiled plan.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct TypePair {
    src: TypeId,
    dst: TypeId,
    options: FieldMappingOptions,
}

impl TypePair {
    fn new(src: &'static Shape, dst: &'static Shape, options: &FieldMappingOptions) -> Self {
        // options only matter to structs, so scalar pairs all share one entry
        let options = match (&src.def, &dst.def) {
            (Def::Scalar(_), Def::Scalar(_)) => &NO_OPTIONS,
            _ => options,
        };
        Self {
            src: src.id.get(),
            dst: dst.id.get(),
            options: options.clone(),
        }
    }
}

enum CacheEntry {
    Ready(Arc<ConversionPlan>),
    Failed(ConvertError),
}

impl CacheEntry {
    fn to_result(&self) -> Result<Arc<ConversionPlan>, ConvertError> {
        match self {
            CacheEntry::Ready(plan) => Ok(Arc::clone(plan)),
            CacheEntry::Failed(err) => Err(err.clone()),
        }
    }
}

/// Builds [`ConversionPlan`]s and keeps them for the life of the compiler.
///
/// Each distinct type pair is compiled at most once, even when many threads
/// ask for it at the same time: a compilation runs under the cache's write
/// lock, and the cache is checked again once that lock is held.
///
/// ```
/// use shapeshift::{FieldMappingOptions, PlanCompiler, PlanKind, Reflect};
///
/// let compiler = PlanCompiler::new();
/// let plan = compiler
///     .compile(Vec::<u8>::SHAPE, Vec::<u32>::SHAPE, &FieldMappingOptions::new())
///     .unwrap();
/// assert_eq!(plan.kind(), PlanKind::Sequence);
///
/// // the list plan and its item plan
/// assert_eq!(compiler.compilations(), 2);
/// compiler
///     .compile(Vec::<u8>::SHAPE, Vec::<u32>::SHAPE, &FieldMappingOptions::new())
///     .unwrap();
/// assert_eq!(compiler.compilations(), 2);
/// ```
#[derive(Default)]
pub struct PlanCompiler {
    cache: RwLock<HashMap<TypePair, CacheEntry>>,
    compilations: AtomicUsize,
}

impl PlanCompiler {
    /// Creates a compiler with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the plan converting `src` into `dst` under `options`,
    /// compiling it (and every plan it depends on) on first use.
    pub fn compile(
        &self,
        src: &'static Shape,
        dst: &'static Shape,
        options: &FieldMappingOptions,
    ) -> Result<Arc<ConversionPlan>, ConvertError> {
        let pair = TypePair::new(src, dst, options);

        // Fast path: check read lock first
        if let Some(entry) = self.cache.read().get(&pair) {
            trace!("{src} -> {dst}: cache hit");
            return entry.to_result();
        }

        let mut cache = self.cache.write();
        // Another thread may have compiled it while we waited for the lock
        if let Some(entry) = cache.get(&pair) {
            trace!("{src} -> {dst}: compiled by another thread");
            return entry.to_result();
        }

        debug!("{src} -> {dst}: compiling");
        let mut session = Session {
            cache: &cache,
            in_progress: HashSet::new(),
            pending: HashMap::new(),
            staged: HashMap::new(),
        };
        let result = session.build(pair.clone(), src, dst, options);
        let staged = session.finish();
        match result {
            Ok(plan) => {
                debug!("{src} -> {dst}: committing {} plans", staged.len());
                self.compilations.fetch_add(staged.len(), Ordering::Relaxed);
                for (pair, plan) in staged {
                    cache.insert(pair, CacheEntry::Ready(plan));
                }
                Ok(plan)
            }
            Err(err) => {
                debug!("{src} -> {dst}: {err}");
                cache.insert(pair, CacheEntry::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Number of plans built so far, counting nested ones. Cache hits do not
    /// count.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    /// Number of type pairs in the cache, failures included.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }
}

/// One top-level compilation and every plan it needs along the way.
///
/// New plans are staged and only reach the cache once the whole compilation
/// succeeded, so a failure never leaves a half-bound recursive plan behind.
pub(crate) struct Session<'c> {
    cache: &'c HashMap<TypePair, CacheEntry>,
    /// Pairs whose plans are being built further up the stack.
    in_progress: HashSet<TypePair>,
    /// Slots handed out for pairs in `in_progress`, bound once they finish.
    pending: HashMap<TypePair, Arc<OnceLock<Arc<ConversionPlan>>>>,
    staged: HashMap<TypePair, Arc<ConversionPlan>>,
}

impl Session<'_> {
    fn finish(self) -> HashMap<TypePair, Arc<ConversionPlan>> {
        self.staged
    }

    /// Returns the plan for a nested pair: cached, staged, deferred (if the
    /// pair is an ancestor of the current one), or freshly built.
    pub(crate) fn child(
        &mut self,
        src: &'static Shape,
        dst: &'static Shape,
        options: &FieldMappingOptions,
    ) -> Result<PlanRef, ConvertError> {
        let pair = TypePair::new(src, dst, options);

        if let Some(entry) = self.cache.get(&pair) {
            return entry.to_result().map(PlanRef::Ready);
        }
        if let Some(plan) = self.staged.get(&pair) {
            return Ok(PlanRef::Ready(Arc::clone(plan)));
        }
        if self.in_progress.contains(&pair) {
            trace!("{src} -> {dst}: recursive, deferring");
            let slot = self.pending.entry(pair).or_default();
            return Ok(PlanRef::Deferred(Arc::clone(slot)));
        }

        self.build(pair, src, dst, options).map(PlanRef::Ready)
    }

    fn build(
        &mut self,
        pair: TypePair,
        src: &'static Shape,
        dst: &'static Shape,
        options: &FieldMappingOptions,
    ) -> Result<Arc<ConversionPlan>, ConvertError> {
        self.in_progress.insert(pair.clone());
        let step = self.dispatch(src, dst, options);
        self.in_progress.remove(&pair);

        let plan = Arc::new(ConversionPlan::new(src, dst, step?));
        trace!("{src} -> {dst}: built {} plan", plan.kind());
        if let Some(slot) = self.pending.remove(&pair) {
            // fresh slot, only ever set here
            let _ = slot.set(Arc::clone(&plan));
        }
        self.staged.insert(pair, Arc::clone(&plan));
        Ok(plan)
    }

    fn dispatch(
        &mut self,
        src: &'static Shape,
        dst: &'static Shape,
        options: &FieldMappingOptions,
    ) -> Result<Step, ConvertError> {
        if src.is_indirection() || dst.is_indirection() {
            return indirect::build(self, src, dst, options).map(Step::Indirect);
        }

        match (&src.def, &dst.def) {
            (Def::Scalar(s), Def::Scalar(d)) => Coercion::resolve(*s, *d)
                .map(Step::Scalar)
                .ok_or(ConvertError::UnsupportedScalarPair { src: *s, dst: *d }),
            (Def::Struct(s), Def::Struct(d)) => {
                record::build(self, src, dst, s, d, options).map(Step::Record)
            }
            (Def::List(s), Def::List(d)) => {
                sequence::build(self, src, dst, s, d, options).map(Step::Sequence)
            }
            (Def::Map(s), Def::Map(d)) => map::build(self, src, dst, s, d, options).map(Step::Map),
            _ => Err(ConvertError::mismatch(
                src,
                dst,
                MismatchReason::IncompatibleKinds {
                    src: src.def.kind(),
                    dst: dst.def.kind(),
                },
            )),
        }
    }
}
