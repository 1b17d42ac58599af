use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

/// One FIFO queue per source, holding values which haven't been paired yet.
pub(crate) trait Buffers {
    /// One value from every queue, in source order.
    type Output;

    /// The number of sources.
    fn len(&self) -> usize;

    /// Returns `true` if every queue holds at least one value.
    fn all_ready(&self) -> bool;

    /// Pop the head of every queue.
    ///
    /// Must only be called after `all_ready` returned `true`.
    fn pop(&mut self) -> Self::Output;
}

impl<T> Buffers for Vec<VecDeque<T>> {
    type Output = Vec<T>;

    fn len(&self) -> usize {
        <[_]>::len(self)
    }

    fn all_ready(&self) -> bool {
        self.iter().all(|queue| !queue.is_empty())
    }

    fn pop(&mut self) -> Self::Output {
        self.iter_mut()
            .map(|queue| queue.pop_front().unwrap())
            .collect()
    }
}

impl<T, const N: usize> Buffers for [VecDeque<T>; N] {
    type Output = [T; N];

    fn len(&self) -> usize {
        N
    }

    fn all_ready(&self) -> bool {
        self.iter().all(|queue| !queue.is_empty())
    }

    fn pop(&mut self) -> Self::Output {
        core::array::from_fn(|index| self[index].pop_front().unwrap())
    }
}

/// What the zipped sequence should do after a source pushed a value.
#[derive(Debug, PartialEq)]
pub(crate) enum Next<T> {
    /// Keep waiting for the other sources.
    Pending,
    /// Every source had a value: these should be combined and emitted.
    Ready(T),
    /// No further tuple can ever be formed: the sequence is over.
    Exhausted,
}

/// The per-subscription queues and done flags of a zip.
#[derive(Debug)]
pub(crate) struct ZipState<B> {
    buffers: B,
    done: FixedBitSet,
}

impl<B: Buffers> ZipState<B> {
    pub(crate) fn new(buffers: B) -> Self {
        let len = buffers.len();
        Self {
            buffers,
            done: FixedBitSet::with_capacity(len),
        }
    }

    /// Let source `index` push into its queue, then decide what happens next.
    ///
    /// Completion is only detected from the pushing source's point of view:
    /// when every *other* source is done and no tuple could be formed.
    pub(crate) fn push_with(&mut self, index: usize, push: impl FnOnce(&mut B)) -> Next<B::Output> {
        push(&mut self.buffers);

        if self.buffers.all_ready() {
            Next::Ready(self.buffers.pop())
        } else if self.others_done(index) {
            Next::Exhausted
        } else {
            Next::Pending
        }
    }

    /// Mark source `index` as done. Returns `true` once every source is.
    pub(crate) fn complete(&mut self, index: usize) -> bool {
        self.done.insert(index);
        self.done.count_ones(..) == self.done.len()
    }

    fn others_done(&self, index: usize) -> bool {
        let own = usize::from(self.done[index]);
        self.done.count_ones(..) - own == self.done.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(len: usize) -> ZipState<Vec<VecDeque<u32>>> {
        ZipState::new((0..len).map(|_| VecDeque::new()).collect())
    }

    fn push(state: &mut ZipState<Vec<VecDeque<u32>>>, index: usize, value: u32) -> Next<Vec<u32>> {
        state.push_with(index, |queues| queues[index].push_back(value))
    }

    #[test]
    fn pairs_by_position() {
        let mut state = state(2);
        assert_eq!(push(&mut state, 0, 1), Next::Pending);
        assert_eq!(push(&mut state, 0, 2), Next::Pending);
        assert_eq!(push(&mut state, 1, 10), Next::Ready(vec![1, 10]));
        assert_eq!(push(&mut state, 1, 20), Next::Ready(vec![2, 20]));
        assert_eq!(push(&mut state, 1, 30), Next::Pending);
    }

    #[test]
    fn exhausted_when_every_other_source_is_done() {
        let mut state = state(3);
        assert!(!state.complete(1));
        assert_eq!(push(&mut state, 0, 1), Next::Pending);
        assert!(!state.complete(2));
        assert_eq!(push(&mut state, 0, 2), Next::Exhausted);
    }

    #[test]
    fn own_done_flag_does_not_count_as_other() {
        let mut state = state(2);
        assert!(!state.complete(0));
        // A late value from an already-done source only looks at the others.
        assert_eq!(push(&mut state, 0, 1), Next::Pending);
        assert!(state.complete(1));
    }

    #[test]
    fn a_done_source_with_queued_values_still_pairs() {
        let mut state = state(2);
        assert_eq!(push(&mut state, 0, 1), Next::Pending);
        assert_eq!(push(&mut state, 0, 2), Next::Pending);
        assert!(!state.complete(0));
        assert_eq!(push(&mut state, 1, 10), Next::Ready(vec![1, 10]));
        assert_eq!(push(&mut state, 1, 20), Next::Ready(vec![2, 20]));
        assert_eq!(push(&mut state, 1, 30), Next::Exhausted);
    }

    #[test]
    fn single_source_passes_through() {
        let mut state = state(1);
        assert_eq!(push(&mut state, 0, 5), Next::Ready(vec![5]));
        assert!(state.complete(0));
    }

    #[test]
    fn arrays_pop_in_source_order() {
        let mut state = ZipState::new([VecDeque::new(), VecDeque::new(), VecDeque::new()]);
        assert_eq!(state.push_with(2, |q| q[2].push_back('c')), Next::Pending);
        assert_eq!(state.push_with(0, |q| q[0].push_back('a')), Next::Pending);
        assert_eq!(
            state.push_with(1, |q| q[1].push_back('b')),
            Next::Ready(['a', 'b', 'c'])
        );
    }
}
