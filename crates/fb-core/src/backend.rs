//! Capability every transform library adapter exposes

use crate::{AlignedBuf, BenchResult, ComplexBuffer, Direction, PlanEffort};

/// Transform library adapter
///
/// Plans are typed per transform kind so a real-to-complex plan can never be
/// executed as a complex one. Plan construction happens outside the timed
/// region; `execute_*` performs exactly one transform application and never
/// modifies its source buffer.
pub trait FftBackend {
    /// Complex buffer layout used by this library
    type Complex: ComplexBuffer;
    /// 1-D complex-to-complex plan
    type C2cPlan;
    /// 1-D real-to-complex plan
    type R2cPlan;
    /// 1-D complex-to-real plan
    type C2rPlan;
    /// 2-D complex-to-complex plan
    type Plan2d;

    /// Name used in report rows
    fn name(&self) -> &'static str;

    /// Effort levels this backend reports as separate rows
    fn efforts(&self) -> &'static [PlanEffort];

    /// Number of complex bins a real transform of length `n` produces
    fn spectrum_len(&self, n: usize) -> usize;

    fn allocate_real(&self, len: usize) -> BenchResult<AlignedBuf<f32>> {
        AlignedBuf::zeroed(len)
    }

    fn allocate_complex(&self, len: usize) -> BenchResult<Self::Complex>;

    fn plan_1d_c2c(
        &mut self,
        n: usize,
        direction: Direction,
        effort: PlanEffort,
    ) -> BenchResult<Self::C2cPlan>;

    fn plan_1d_r2c(&mut self, n: usize, effort: PlanEffort) -> BenchResult<Self::R2cPlan>;

    fn plan_1d_c2r(&mut self, n: usize, effort: PlanEffort) -> BenchResult<Self::C2rPlan>;

    fn plan_2d_c2c(
        &mut self,
        nx: usize,
        ny: usize,
        direction: Direction,
        effort: PlanEffort,
    ) -> BenchResult<Self::Plan2d>;

    fn execute_c2c(
        &self,
        plan: &mut Self::C2cPlan,
        dst: &mut Self::Complex,
        src: &Self::Complex,
    ) -> BenchResult<()>;

    fn execute_r2c(
        &self,
        plan: &mut Self::R2cPlan,
        dst: &mut Self::Complex,
        src: &[f32],
    ) -> BenchResult<()>;

    fn execute_c2r(
        &self,
        plan: &mut Self::C2rPlan,
        dst: &mut [f32],
        src: &Self::Complex,
    ) -> BenchResult<()>;

    fn execute_2d(
        &self,
        plan: &mut Self::Plan2d,
        dst: &mut Self::Complex,
        src: &Self::Complex,
    ) -> BenchResult<()>;

    /// Release a plan and its backend-side resources
    ///
    /// Takes the plan by value, so each plan is destroyed exactly once.
    fn destroy<P>(&mut self, plan: P) {
        log::trace!("{}: destroying {}", self.name(), std::any::type_name::<P>());
        drop(plan);
    }
}
