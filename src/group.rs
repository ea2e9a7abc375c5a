//! Finite abelian groups over opaque elements
//!
//! A [`FiniteGroup`] is a materialized carrier set plus a [`GroupLaw`]
//! (operation and inverse) and an identity element. Curve points under the
//! chord-tangent law and roots of unity under field multiplication are the
//! two kinds of elements this crate plugs in, but any law works.
//!
//! Subgroups and quotients are fresh `FiniteGroup` values; the parent is
//! never mutated. Each group memoizes element orders, and subgroups are
//! seeded with the orders their parent already knows.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::errors::{Error, Result};
use crate::integer::{divisors, IntegerOracle};

/// Operation and inverse of a group
///
/// Implementations must be associative and commutative on the carrier the
/// group is built over, and agree with the identity handed to
/// [`FiniteGroup::new`].
pub trait GroupLaw<T> {
    fn operate(&self, a: &T, b: &T) -> T;

    fn inverse(&self, a: &T) -> T;
}

/// A group law made of two closures
pub struct FnLaw<T> {
    operation: Box<dyn Fn(&T, &T) -> T>,
    inverse: Box<dyn Fn(&T) -> T>,
}

impl<T> FnLaw<T> {
    pub fn new(
        operation: impl Fn(&T, &T) -> T + 'static,
        inverse: impl Fn(&T) -> T + 'static,
    ) -> Self {
        Self {
            operation: Box::new(operation),
            inverse: Box::new(inverse),
        }
    }
}

impl<T> GroupLaw<T> for FnLaw<T> {
    fn operate(&self, a: &T, b: &T) -> T {
        (self.operation)(a, b)
    }

    fn inverse(&self, a: &T) -> T {
        (self.inverse)(a)
    }
}

/// One coset g·H of a quotient group, representative first
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Coset<T> {
    members: Rc<[T]>,
}

impl<T> Coset<T> {
    fn new(members: Vec<T>) -> Self {
        Self {
            members: members.into(),
        }
    }

    /// The element this coset was built from
    pub fn representative(&self) -> &T {
        &self.members[0]
    }

    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for Coset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Coset").field(&self.members).finish()
    }
}

/// Cosets of a subgroup and, for every element of the parent, the index of
/// the coset holding it
struct Partition<T> {
    cosets: Vec<Vec<T>>,
    index: HashMap<T, usize>,
}

/// Law of G/H on cosets: combine representatives, look up the coset
struct CosetLaw<T> {
    parent: Rc<dyn GroupLaw<T>>,
    cosets: Vec<Coset<T>>,
    index: HashMap<T, usize>,
    subgroup: Vec<T>,
}

impl<T: Clone + Eq + Hash> CosetLaw<T> {
    fn coset_of(&self, element: T) -> Coset<T> {
        match self.index.get(&element) {
            Some(&i) => self.cosets[i].clone(),
            // only reachable when the parent carrier is not closed under its law
            None => Coset::new(
                self.subgroup
                    .iter()
                    .map(|h| self.parent.operate(&element, h))
                    .collect(),
            ),
        }
    }
}

impl<T: Clone + Eq + Hash> GroupLaw<Coset<T>> for CosetLaw<T> {
    fn operate(&self, a: &Coset<T>, b: &Coset<T>) -> Coset<T> {
        self.coset_of(
            self.parent
                .operate(a.representative(), b.representative()),
        )
    }

    fn inverse(&self, a: &Coset<T>) -> Coset<T> {
        self.coset_of(self.parent.inverse(a.representative()))
    }
}

/// Law of G/H on coset representatives
struct RepresentativeLaw<T> {
    parent: Rc<dyn GroupLaw<T>>,
    representative: HashMap<T, T>,
}

impl<T: Clone + Eq + Hash> RepresentativeLaw<T> {
    fn canonical(&self, element: T) -> T {
        match self.representative.get(&element) {
            Some(representative) => representative.clone(),
            None => element,
        }
    }
}

impl<T: Clone + Eq + Hash> GroupLaw<T> for RepresentativeLaw<T> {
    fn operate(&self, a: &T, b: &T) -> T {
        self.canonical(self.parent.operate(a, b))
    }

    fn inverse(&self, a: &T) -> T {
        self.canonical(self.parent.inverse(a))
    }
}

/// A finite abelian group materialized over its carrier set
///
/// # Example
/// ```
/// use bgn_pairing::group::{FiniteGroup, FnLaw};
///
/// // Z/12 under addition
/// let z12 = FiniteGroup::new(
///     (0..12u64).collect(),
///     0,
///     FnLaw::new(|a: &u64, b: &u64| (a + b) % 12, |a: &u64| (12 - a) % 12),
/// )
/// .unwrap();
/// assert_eq!(z12.order(&8).unwrap(), 3);
/// ```
pub struct FiniteGroup<T> {
    elements: Vec<T>,
    members: HashSet<T>,
    identity: T,
    law: Rc<dyn GroupLaw<T>>,
    divisors: Vec<u64>,
    orders: RefCell<HashMap<T, u64>>,
}

impl<T> FiniteGroup<T>
where
    T: Clone + Eq + Hash + fmt::Debug + 'static,
{
    /// Builds a group from its carrier, identity and law
    ///
    /// # Errors
    /// [`Error::InvalidInput`] when the carrier is empty or lacks the identity.
    pub fn new(elements: Vec<T>, identity: T, law: impl GroupLaw<T> + 'static) -> Result<Self> {
        if !elements.contains(&identity) {
            return Err(Error::InvalidInput(format!(
                "group carrier of {} elements does not contain the identity {identity:?}",
                elements.len()
            )));
        }
        Ok(Self::from_parts(elements, identity, Rc::new(law), HashMap::new()))
    }

    fn from_parts(
        elements: Vec<T>,
        identity: T,
        law: Rc<dyn GroupLaw<T>>,
        mut orders: HashMap<T, u64>,
    ) -> Self {
        let members: HashSet<T> = elements.iter().cloned().collect();
        orders.retain(|element, _| members.contains(element));
        orders.insert(identity.clone(), 1);
        Self {
            divisors: divisors(elements.len() as u64),
            elements,
            members,
            identity,
            law,
            orders: RefCell::new(orders),
        }
    }

    /// A subgroup sharing this group's law and known orders
    fn subgroup_view(&self, elements: Vec<T>) -> Self {
        Self::from_parts(
            elements,
            self.identity.clone(),
            Rc::clone(&self.law),
            self.orders.borrow().clone(),
        )
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn identity(&self) -> &T {
        &self.identity
    }

    /// |G|
    pub fn order_of_group(&self) -> usize {
        self.elements.len()
    }

    pub fn contains(&self, element: &T) -> bool {
        self.members.contains(element)
    }

    pub fn operate(&self, a: &T, b: &T) -> T {
        self.law.operate(a, b)
    }

    pub fn inverse(&self, a: &T) -> T {
        self.law.inverse(a)
    }

    /// Applies the operation of `element` with itself `exp` times
    /// (double-and-add); negative exponents start from the inverse
    pub fn exponentiation(&self, element: &T, exp: i64) -> T {
        if exp < 0 {
            self.power(&self.inverse(element), exp.unsigned_abs())
        } else {
            self.power(element, exp.unsigned_abs())
        }
    }

    fn power(&self, element: &T, exp: u64) -> T {
        let mut result = self.identity.clone();
        for i in (0..u64::BITS - exp.leading_zeros()).rev() {
            result = self.operate(&result, &result);
            if (exp >> i) & 1 == 1 {
                result = self.operate(&result, element);
            }
        }
        result
    }

    /// Order of `element`: the smallest divisor d of |G| with element^d = e
    ///
    /// # Errors
    /// [`Error::OrderNotFound`] when no divisor of |G| annihilates the
    /// element, which means the carrier or law is inconsistent.
    pub fn order(&self, element: &T) -> Result<u64> {
        if let Some(&order) = self.orders.borrow().get(element) {
            return Ok(order);
        }
        let order = self
            .divisors
            .iter()
            .copied()
            .find(|&d| self.power(element, d) == self.identity)
            .ok_or_else(|| Error::OrderNotFound {
                element: format!("{element:?}"),
                group_order: self.order_of_group(),
            })?;
        self.orders.borrow_mut().insert(element.clone(), order);
        Ok(order)
    }

    /// The non-identity element of smallest order
    ///
    /// # Errors
    /// [`Error::InvalidInput`] for the trivial group.
    pub fn get_nontrivial_element(&self) -> Result<T> {
        let mut best: Option<(u64, &T)> = None;
        for element in &self.elements {
            if *element == self.identity {
                continue;
            }
            let order = self.order(element)?;
            match best {
                Some((smallest, _)) if smallest <= order => {}
                _ => best = Some((order, element)),
            }
        }
        best.map(|(_, element)| element.clone())
            .ok_or_else(|| Error::InvalidInput("group has only one element".into()))
    }

    /// The cyclic subgroup ⟨g⟩, listed as e, g, g², ...
    ///
    /// # Errors
    /// [`Error::OrderNotFound`] when the powers of `g` do not return to the
    /// identity within |G| steps.
    pub fn cyclic_subgroup(&self, generator: &T) -> Result<Self> {
        let mut powers = vec![self.identity.clone()];
        let mut current = generator.clone();
        while current != self.identity {
            if powers.len() >= self.order_of_group() {
                return Err(Error::OrderNotFound {
                    element: format!("{generator:?}"),
                    group_order: self.order_of_group(),
                });
            }
            powers.push(current.clone());
            current = self.operate(&current, generator);
        }
        let order = powers.len() as u64;
        self.orders.borrow_mut().insert(generator.clone(), order);
        Ok(self.subgroup_view(powers))
    }

    /// The subgroup generated by `generators`
    ///
    /// Starts from {e} and, for each generator g of order m, replaces the
    /// current subgroup H by the union of the cosets g·H, g²·H, ..., gᵐ·H.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] for a generator outside the group.
    pub fn subgroup_generated_by(&self, generators: &[T]) -> Result<Self> {
        let mut members = vec![self.identity.clone()];
        let mut seen: HashSet<T> = members.iter().cloned().collect();

        for generator in generators {
            if !self.contains(generator) {
                return Err(Error::InvalidInput(format!(
                    "generator {generator:?} is not an element of the group"
                )));
            }
            let order = self.order(generator)?;
            let previous = members.clone();
            let mut factor = self.identity.clone();
            for _ in 0..order {
                factor = self.operate(&factor, generator);
                for element in &previous {
                    let product = self.operate(&factor, element);
                    if seen.insert(product.clone()) {
                        members.push(product);
                    }
                }
            }
        }

        Ok(self.subgroup_view(members))
    }

    /// E[n]: the elements whose order divides n
    pub fn n_torsion_subgroup(&self, n: u64) -> Result<Self> {
        let mut torsion = Vec::new();
        for element in &self.elements {
            if n % self.order(element)? == 0 {
                torsion.push(element.clone());
            }
        }
        Ok(self.subgroup_view(torsion))
    }

    fn check_subgroup(&self, subgroup: &FiniteGroup<T>) -> Result<()> {
        if subgroup.identity != self.identity {
            return Err(Error::InvalidInput(
                "subgroup identity differs from the group identity".into(),
            ));
        }
        if let Some(stray) = subgroup.elements.iter().find(|e| !self.contains(e)) {
            return Err(Error::InvalidInput(format!(
                "{stray:?} is not an element of the group"
            )));
        }
        if self.order_of_group() % subgroup.order_of_group() != 0 {
            return Err(Error::InvalidInput(format!(
                "a subgroup of order {} cannot divide a group of order {}",
                subgroup.order_of_group(),
                self.order_of_group()
            )));
        }
        Ok(())
    }

    /// Splits the carrier into cosets of `subgroup`
    ///
    /// Repeatedly takes the first element not yet placed, computes its coset
    /// and removes the coset from the pool.
    fn partition(&self, subgroup: &FiniteGroup<T>) -> Partition<T> {
        let mut cosets = Vec::with_capacity(self.order_of_group() / subgroup.order_of_group());
        let mut index = HashMap::with_capacity(self.order_of_group());
        for representative in &self.elements {
            if index.contains_key(representative) {
                continue;
            }
            let coset: Vec<T> = subgroup
                .elements
                .iter()
                .map(|h| self.operate(representative, h))
                .collect();
            for member in &coset {
                index.insert(member.clone(), cosets.len());
            }
            trace!(representative = ?representative, size = coset.len(), "new coset");
            cosets.push(coset);
        }
        Partition { cosets, index }
    }

    /// G/H, whose elements are the cosets of H
    ///
    /// # Errors
    /// [`Error::InvalidInput`] when `subgroup` is not a subset of this group
    /// sharing its identity, or its order does not divide |G|.
    #[instrument(
        level = "debug",
        skip_all,
        fields(order = self.order_of_group(), subgroup = subgroup.order_of_group())
    )]
    pub fn quotient_group(&self, subgroup: &FiniteGroup<T>) -> Result<FiniteGroup<Coset<T>>> {
        self.check_subgroup(subgroup)?;
        let Partition { cosets, index } = self.partition(subgroup);
        let cosets: Vec<Coset<T>> = cosets.into_iter().map(Coset::new).collect();
        let identity = index
            .get(&self.identity)
            .map(|&i| cosets[i].clone())
            .ok_or_else(|| Error::InvalidInput("identity is not in the carrier".into()))?;
        debug!(cosets = cosets.len(), "built quotient group");

        let law = CosetLaw {
            parent: Rc::clone(&self.law),
            cosets: cosets.clone(),
            index,
            subgroup: subgroup.elements.clone(),
        };
        Ok(FiniteGroup::from_parts(
            cosets,
            identity,
            Rc::new(law),
            HashMap::new(),
        ))
    }

    /// G/H with every coset stood in for by its representative
    fn quotient_by_representatives(&self, subgroup: &FiniteGroup<T>) -> Result<Self> {
        self.check_subgroup(subgroup)?;
        let Partition { cosets, .. } = self.partition(subgroup);
        let mut representative = HashMap::with_capacity(self.order_of_group());
        let mut representatives = Vec::with_capacity(cosets.len());
        for coset in cosets {
            let head = coset[0].clone();
            for member in coset {
                representative.insert(member, head.clone());
            }
            representatives.push(head);
        }
        let identity = representative
            .get(&self.identity)
            .cloned()
            .ok_or_else(|| Error::InvalidInput("identity is not in the carrier".into()))?;

        let law = RepresentativeLaw {
            parent: Rc::clone(&self.law),
            representative,
        };
        Ok(Self::from_parts(
            representatives,
            identity,
            Rc::new(law),
            HashMap::new(),
        ))
    }

    /// Decomposes the group into cyclic factors of prime-power order
    ///
    /// Each Sylow component (elements whose order is a power of one prime q)
    /// is peeled apart by repeatedly taking an element of maximal order qᵏ:
    /// if qᵏ is the component's order the component is cyclic; if qᵏ·q is,
    /// the component is Z_{qᵏ} × Z_q; otherwise qᵏ is emitted and the search
    /// continues in the quotient by ⟨g⟩. The product of the output equals
    /// |G|; the trivial group gives `[1]`.
    #[instrument(level = "debug", skip_all, fields(order = self.order_of_group()))]
    pub fn classify_finite_abelian_group<O>(&self, oracle: &O) -> Result<Vec<u64>>
    where
        O: IntegerOracle + ?Sized,
    {
        let mut factors = Vec::new();

        for (prime, exponent) in oracle.factorize(self.order_of_group() as u64) {
            let prime_powers: Vec<u64> = (0..=exponent).map(|i| prime.pow(i)).collect();
            let mut sylow = Vec::new();
            for element in &self.elements {
                if prime_powers.contains(&self.order(element)?) {
                    sylow.push(element.clone());
                }
            }
            let component = self.subgroup_view(sylow);
            let size = component.order_of_group() as u64;
            debug!(prime, size, "sylow component");

            if size == 1 {
                continue;
            }
            if oracle.is_prime(size) {
                factors.push(size);
                continue;
            }

            let mut current = component;
            while current.order_of_group() > 1 {
                let size = current.order_of_group() as u64;
                let mut orders = Vec::with_capacity(current.order_of_group());
                for element in current.elements() {
                    orders.push((element.clone(), current.order(element)?));
                }
                let nontrivial = || orders.iter().map(|(_, order)| *order).filter(|&o| o > 1);
                let (Some(smallest), Some(largest)) = (nontrivial().min(), nontrivial().max())
                else {
                    break;
                };

                if largest == size {
                    factors.push(largest);
                    break;
                }
                if largest * smallest == size {
                    factors.push(largest);
                    factors.push(smallest);
                    break;
                }

                let generator = orders
                    .iter()
                    .find(|(_, order)| *order == largest)
                    .map(|(element, _)| element.clone())
                    .ok_or_else(|| Error::OrderNotFound {
                        element: format!("element of order {largest}"),
                        group_order: current.order_of_group(),
                    })?;
                let cyclic = current.cyclic_subgroup(&generator)?;
                factors.push(cyclic.order_of_group() as u64);
                current = current.quotient_by_representatives(&cyclic)?;
            }
        }

        if factors.is_empty() {
            factors.push(1);
        }
        Ok(factors)
    }

    /// Invariant factors d₁ | d₂ | ... | dₖ of the group
    ///
    /// Regroups [`classify_finite_abelian_group`](Self::classify_finite_abelian_group):
    /// the i-th largest prime power of every prime multiply into one factor.
    pub fn invariant_factors<O>(&self, oracle: &O) -> Result<Vec<u64>>
    where
        O: IntegerOracle + ?Sized,
    {
        let elementary = self.classify_finite_abelian_group(oracle)?;
        if elementary == [1] {
            return Ok(elementary);
        }

        let mut by_prime: HashMap<u64, Vec<u64>> = HashMap::new();
        for power in elementary {
            let prime = oracle
                .factorize(power)
                .first()
                .map(|&(prime, _)| prime)
                .unwrap_or(power);
            by_prime.entry(prime).or_default().push(power);
        }

        let length = by_prime.values().map(Vec::len).max().unwrap_or(0);
        let mut invariant = vec![1u64; length];
        for powers in by_prime.values_mut() {
            powers.sort_unstable_by(|a, b| b.cmp(a));
            for (slot, power) in invariant.iter_mut().zip(powers.iter()) {
                *slot *= power;
            }
        }
        invariant.reverse();
        Ok(invariant)
    }
}

impl<T: fmt::Debug> fmt::Debug for FiniteGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiniteGroup")
            .field("order", &self.elements.len())
            .field("identity", &self.identity)
            .finish()
    }
}

impl<T> fmt::Display for FiniteGroup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group (order {})", self.elements.len())
    }
}
