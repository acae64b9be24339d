//! Bump-style node storage with generational handles.
//!
//! IR nodes (slur partners, bar event chains) are cross-referenced by
//! `Handle<T>` — an index into an `Arena<T>` plus a generation counter
//! — instead of raw pointers, so a stale reference is a catchable bug
//! (`Arena::get` returns `None`) instead of undefined behaviour.
//!
//! Free-lists for short-lived continuation auxiliaries (slur/gap/nbar/
//! hairpin/overbeam/uolay records, recycled across systems) are layered
//! on top as a simple `Vec<Handle<T>>` LIFO stack per `Arena`.

use std::marker::PhantomData;

/// A generational index into an [`Arena<T>`].
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Handle<T> {}
impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}
impl<T> Eq for Handle<T> {}
impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}
impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({}#{})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena-allocated storage for one node type. Allocations never move
/// once made (no `Vec` element is ever relocated out from under a live
/// handle — growth only appends); storage is freed wholesale when the
/// `Arena` is dropped, matching the original's init/grow/free-all
/// lifecycle.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> Handle<T> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            Handle {
                index,
                generation: slot.generation,
                _marker: PhantomData,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            Handle {
                index,
                generation: 0,
                _marker: PhantomData,
            }
        }
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Recycle a node's storage for future `insert` calls, bumping its
    /// generation so old handles stop resolving. Used for the
    /// continuation auxiliaries (slur/gap/nbar/hairpin records) freed
    /// back to their free list at system end.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        value
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value.as_ref().map(|v| {
                (
                    Handle {
                        index: i as u32,
                        generation: slot.generation,
                        _marker: PhantomData,
                    },
                    v,
                )
            })
        })
    }
}

/// A LIFO free-list of recycled handles for slur/gap/hairpin-style
/// per-system records. Push a handle back when a system is torn down;
/// pop it to satisfy the next allocation instead of calling
/// `Arena::insert` again.
#[derive(Default)]
pub struct FreeList<T> {
    stack: Vec<Handle<T>>,
}

impl<T> FreeList<T> {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, handle: Handle<T>) {
        self.stack.push(handle);
    }

    pub fn pop(&mut self) -> Option<Handle<T>> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_roundtrip() {
        let mut arena: Arena<&'static str> = Arena::new();
        let h = arena.insert("hello");
        assert_eq!(arena.get(h), Some(&"hello"));
    }

    #[test]
    fn stale_handle_after_remove_does_not_resolve() {
        let mut arena: Arena<i32> = Arena::new();
        let h = arena.insert(42);
        arena.remove(h);
        assert_eq!(arena.get(h), None);
    }

    #[test]
    fn recycled_slot_gets_fresh_generation() {
        let mut arena: Arena<i32> = Arena::new();
        let h1 = arena.insert(1);
        arena.remove(h1);
        let h2 = arena.insert(2);
        assert_eq!(h2.index, h1.index);
        assert_ne!(h2.generation, h1.generation);
        assert_eq!(arena.get(h1), None);
        assert_eq!(arena.get(h2), Some(&2));
    }

    #[test]
    fn free_list_is_lifo() {
        let mut arena: Arena<i32> = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let mut free: FreeList<i32> = FreeList::new();
        free.push(a);
        free.push(b);
        assert_eq!(free.pop(), Some(b));
        assert_eq!(free.pop(), Some(a));
        assert_eq!(free.pop(), None);
    }
}
