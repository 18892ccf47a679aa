//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Discretization](#discretization)
//! - [Hard walls](#hard-walls)
//! - [Crank-Nicolson stepping](#crank-nicolson-stepping)
//! - [Choosing a time step](#choosing-a-time-step)
//!
//! # Background
//! This crate integrates the one-dimensional time-dependent Schrödinger
//! equation (TDSE) in natural units (*ħ* = *m* = 1),
//! ```text
//!   ∂           1 ∂²
//! i -- ψ(x, t) = - - --- ψ(x, t) + V(x) ψ(x, t)
//!   ∂t             2 ∂x²
//! ```
//! for a particle confined to the finite domain [0, *L*] by infinitely tall
//! walls, under an arbitrary sampled potential *V*(*x*). The formal solution
//! for a time-independent Hamiltonian *H* is
//! ```text
//! ψ(x, t + δt) = exp(-i δt H) ψ(x, t)
//! ```
//! and the task of any propagation scheme is to approximate the action of
//! the exponential without destroying its two defining properties: it is
//! unitary (probability is conserved) and it is diagonal in the energy
//! eigenbasis (stationary states only accumulate phase).
//!
//! # Discretization
//! Space is discretized over a uniform grid,
//! ```text
//! x[i] = i δx, i ∊ {0, ..., N - 1}, δx = L / (N - 1)
//! ```
//! and the second derivative is replaced by the standard second-order
//! central difference, giving each interior row of the Hamiltonian the
//! three-point stencil
//! ```text
//!              ψ[i - 1] - 2 ψ[i] + ψ[i + 1]
//! (H ψ)[i] = - ---------------------------- + V[i] ψ[i]
//!                          2 δx²
//! ```
//! i.e. a main-diagonal element 1/*δx*² + *V*\[*i*\] and off-diagonal
//! elements -1/(2 *δx*²). The operator is real, symmetric, and tridiagonal —
//! Hermitian by construction, which the stepping scheme depends on — and is
//! stored as its two bands only, never as a dense matrix.
//!
//! The discrete eigenvalues of the kinetic part are
//! (1 - cos *k* *δx*) / *δx*² for wavenumbers *k* the grid can represent,
//! approaching the continuum *k*²/2 for *k* *δx* ≪ 1; wavefunctions with
//! structure on the scale of a few grid points are therefore propagated with
//! the wrong phase, which sets the resolution requirement for packet
//! momenta.
//!
//! # Hard walls
//! The infinite well forces ψ(0) = ψ(*L*) = 0 at all times. Here the wall
//! points are kept in the arrays but decoupled from the dynamics: their
//! Hamiltonian rows and columns are zeroed (preserving symmetry), their rows
//! in both step operators reduce to the identity, and the propagator re-pins
//! both samples to exactly zero after every solve. A state that starts with
//! zero amplitude on the walls therefore keeps exactly zero amplitude there
//! for any number of steps, regardless of the potential.
//!
//! # Crank-Nicolson stepping
//! The explicit (forward-Euler) discretization of the TDSE multiplies each
//! energy eigencomponent by 1 - i *δt* *E*, a number of magnitude strictly
//! greater than 1 — the scheme amplifies every component and diverges. The
//! implicit (backward-Euler) scheme divides by the same factor and instead
//! damps every component: stable, but probability decays. Averaging the two
//! yields the Crank-Nicolson scheme used here,
//! ```text
//! (I + i δt/2 H) ψ(t + δt) = (I - i δt/2 H) ψ(t)
//! ```
//! whose one-step map is the Cayley transform of *H*,
//! ```text
//! U = (I + i δt/2 H)⁻¹ (I - i δt/2 H)
//! ```
//! For Hermitian *H* every eigencomponent is multiplied by
//! ```text
//! 1 - i δt E / 2
//! --------------- = exp(-i 2 arctan(δt E / 2))
//! 1 + i δt E / 2
//! ```
//! a number of magnitude exactly 1: the map is exactly unitary for any *δt*,
//! so norm conservation over thousands of steps comes from the algebra
//! rather than from renormalization, and arbitrarily stiff potentials only
//! rotate phases faster instead of blowing up.
//!
//! Since *H* is tridiagonal, both step operators are tridiagonal, and the
//! implicit system is solved in O(*N*) by the Thomas algorithm (tridiagonal
//! LU with forward elimination and back substitution). The matrix
//! *I* + i *δt*/2 *H* has eigenvalues 1 + i *δt* *E*/2 of magnitude at least
//! 1, so the solve cannot encounter a genuinely singular system; a vanishing
//! pivot is surfaced as an error because it indicates a malformed operator,
//! not a numerical accident.
//!
//! # Choosing a time step
//! Crank-Nicolson is unconditionally stable, so *δt* is purely an accuracy
//! knob. The phase picked up per step by a component of energy *E* is
//! 2 arctan(*δt* *E* / 2) instead of the exact *δt* *E*, with relative error
//! (*δt* *E*)²/12 + O((*δt* *E*)⁴). The largest energy the grid supports
//! scales like 1/*δx*², so taking *δt* on the order of *δx*² keeps even the
//! fastest representable modes accurate; physically relevant states occupy
//! far lower energies, so this choice is conservative and larger steps only
//! degrade the phases of components that carry little weight.
