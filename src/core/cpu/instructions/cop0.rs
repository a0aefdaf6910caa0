// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::super::CPU;

impl CPU {
    // === COP0 Instructions ===

    /// MFC0: Move From COP0
    ///
    /// Format: mfc0 rt, rd
    /// Operation: rt = COP0[rd] (with load delay)
    pub(crate) fn op_mfc0(&mut self, rt: u8, rd: u8) {
        let value = self.cop0.read(rd as usize);
        self.set_reg_delayed(rt, value);
    }

    /// MTC0: Move To COP0
    ///
    /// Format: mtc0 rt, rd
    /// Operation: COP0[rd] = rt, subject to the per-register write policy
    pub(crate) fn op_mtc0(&mut self, rt: u8, rd: u8) {
        let value = self.reg(rt);
        self.cop0.write(rd as usize, value);
    }

    /// ERET: Return from Exception
    ///
    /// Clears Status.EXL and resumes at EPC. There is no delay slot.
    pub(crate) fn op_eret(&mut self) {
        self.return_from_exception();
    }
}
